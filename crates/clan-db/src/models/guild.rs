//! Guild database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the guilds table; `members` is aggregated from guild_members
#[derive(Debug, Clone, FromRow)]
pub struct GuildModel {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub admins: Vec<i64>,
    pub members: Vec<i64>,
    pub active_dataset: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
