//! Ledger row models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DamageRecordModel {
    pub id: i64,
    pub guild_id: i64,
    pub dataset: i32,
    pub member_id: i64,
    pub proxy_id: Option<i64>,
    pub boss: i16,
    pub cycle: i32,
    pub hp_before: i64,
    pub damage: i64,
    pub comment: Option<String>,
    pub is_bonus_attempt: bool,
    pub earns_bonus: bool,
    pub is_override: bool,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReservationModel {
    pub id: i64,
    pub kind: String,
    pub guild_id: i64,
    pub dataset: i32,
    pub member_id: i64,
    pub boss: i16,
    pub cycle: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SlUsageModel {
    pub id: i64,
    pub guild_id: i64,
    pub dataset: i32,
    pub member_id: i64,
    pub proxy_id: Option<i64>,
    pub boss: Option<i16>,
    pub cycle: Option<i32>,
    pub comment: Option<String>,
    pub used_at: DateTime<Utc>,
}
