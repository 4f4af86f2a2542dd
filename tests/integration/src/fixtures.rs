//! Ids, request bodies and the response shapes tests read back

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "battle-ready-42";

static COUNTER: AtomicI64 = AtomicI64::new(1);

/// Distinct across tests and across runs against the same database
pub fn unique_id() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64);
    millis * 1000 + COUNTER.fetch_add(1, Ordering::SeqCst) % 1000
}

pub fn create_guild_body(guild_id: i64, region: &str, creator_name: &str) -> Value {
    json!({
        "guild_id": guild_id.to_string(),
        "name": format!("Guild {guild_id}"),
        "region": region,
        "creator_name": creator_name,
    })
}

pub fn damage_body(boss: i32, damage: &str) -> Value {
    json!({ "boss": boss, "damage": damage })
}

pub fn kill_body(boss: i32) -> Value {
    json!({ "boss": boss, "kill": true })
}

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub member_id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct GuildBody {
    pub id: String,
    pub name: String,
    pub region: String,
    pub members: Vec<String>,
    pub admins: Vec<String>,
    pub active_dataset: i32,
}

#[derive(Debug, Deserialize)]
pub struct MemberBody {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct BossBody {
    pub boss: i32,
    pub cycle: i32,
    pub stage: i32,
    pub hp: i64,
    pub max_hp: i64,
    pub challengeable: bool,
}

#[derive(Debug, Deserialize)]
pub struct BoardBody {
    pub dataset: i32,
    pub max_challengeable_cycle: i32,
    pub bosses: Vec<BossBody>,
}

impl BoardBody {
    pub fn boss(&self, boss: i32) -> &BossBody {
        &self.bosses[(boss - 1) as usize]
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordBody {
    pub id: String,
    pub member_id: String,
    pub proxy_id: Option<String>,
    pub boss: i32,
    pub cycle: i32,
    pub hp_before: i64,
    pub damage: i64,
    pub is_kill: bool,
    pub is_bonus_attempt: bool,
    pub earns_bonus: bool,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct KillBody {
    pub boss: i32,
    pub cycle: i32,
    pub stop: Vec<String>,
    pub tree_cleared: Vec<String>,
    pub now_go: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptBody {
    pub record: RecordBody,
    pub boss: BossBody,
    pub kill: Option<KillBody>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationBody {
    pub id: String,
    pub kind: String,
    pub member_id: String,
    pub boss: i32,
    pub cycle: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TotalsBody {
    pub full_attempts: i32,
    pub bonus_outstanding: i32,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub member_id: String,
    pub name: String,
    pub challenged: i32,
    pub bonus_used: i32,
    pub bonus_remaining: i32,
    pub used_sl: bool,
}
