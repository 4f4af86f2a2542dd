//! SL usage - daily retry-token consumption marker

use chrono::{DateTime, Utc};

use crate::value_objects::{BossIndex, GuildId, MemberId, RecordId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlUsage {
    pub id: RecordId,
    pub guild_id: GuildId,
    pub dataset: i32,
    pub member_id: MemberId,
    pub proxy_id: Option<MemberId>,
    pub boss: Option<BossIndex>,
    pub cycle: Option<i32>,
    pub comment: Option<String>,
    pub used_at: DateTime<Utc>,
}
