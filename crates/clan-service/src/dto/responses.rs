//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output. Ids are
//! serialized as strings for JavaScript compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use clan_core::{BossIndex, DailyStatus, GuildId, MemberId, RecordId, Region, ReservationKind};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Liveness check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Readiness check body
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// `postgres` or `memory`
    pub storage: &'static str,
    pub storage_healthy: bool,
}

impl ReadinessResponse {
    pub fn new(storage: &'static str, storage_healthy: bool) -> Self {
        Self {
            ready: storage_healthy,
            storage,
            storage_healthy,
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub member_id: MemberId,
    pub token: String,
}

// ============================================================================
// Guild / Member Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GuildResponse {
    pub id: GuildId,
    pub name: String,
    pub region: Region,
    pub members: Vec<MemberId>,
    pub admins: Vec<MemberId>,
    pub active_dataset: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: MemberId,
    pub name: String,
    pub is_admin: bool,
}

/// Result of clearing a dataset
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClearedResponse {
    pub dataset: i32,
    pub removed: u64,
}

// ============================================================================
// Boss Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BossStatusResponse {
    pub boss: BossIndex,
    pub cycle: i32,
    pub stage: i32,
    pub hp: i64,
    pub max_hp: i64,
    pub challengeable: bool,
}

/// All bosses of the live dataset
#[derive(Debug, Clone, Serialize)]
pub struct BoardResponse {
    pub dataset: i32,
    pub max_challengeable_cycle: i32,
    pub bosses: Vec<BossStatusResponse>,
}

// ============================================================================
// Ledger Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub id: RecordId,
    pub member_id: MemberId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<MemberId>,
    pub boss: BossIndex,
    pub cycle: i32,
    pub hp_before: i64,
    pub damage: i64,
    pub comment: Option<String>,
    pub is_kill: bool,
    pub is_bonus_attempt: bool,
    pub earns_bonus: bool,
    pub is_override: bool,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    pub id: RecordId,
    pub kind: ReservationKind,
    pub member_id: MemberId,
    pub boss: BossIndex,
    pub cycle: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlUsageResponse {
    pub id: RecordId,
    pub member_id: MemberId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<MemberId>,
    pub boss: Option<BossIndex>,
    pub cycle: Option<i32>,
    pub comment: Option<String>,
    pub used_at: DateTime<Utc>,
}

/// Subscriptions dropped by a cancel
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

/// Members a reminder was sent to
#[derive(Debug, Clone, Serialize)]
pub struct RemindedResponse {
    pub reminded: Vec<MemberId>,
}

/// Recipients of the kill notices
#[derive(Debug, Clone, Serialize)]
pub struct KillNoticeResponse {
    pub boss: BossIndex,
    pub cycle: i32,
    pub stop: Vec<MemberId>,
    pub tree_cleared: Vec<MemberId>,
    pub now_go: Vec<MemberId>,
}

/// Outcome of a successful `commit_record`
#[derive(Debug, Clone, Serialize)]
pub struct RecordReceipt {
    pub record: RecordResponse,
    /// The boss after the hit
    pub boss: BossStatusResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill: Option<KillNoticeResponse>,
}

// ============================================================================
// Status Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MemberStatusResponse {
    pub member_id: MemberId,
    pub name: String,
    pub day: NaiveDate,
    #[serde(flatten)]
    pub status: DailyStatus,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TotalsResponse {
    pub day: NaiveDate,
    pub full_attempts: i32,
    pub bonus_outstanding: i32,
}
