//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the members table; `guild_ids` is aggregated from guild_members
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: i64,
    pub name: String,
    pub guild_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
