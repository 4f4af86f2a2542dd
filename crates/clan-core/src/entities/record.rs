//! Damage record - one reported hit on a boss

use chrono::{DateTime, Utc};

use crate::value_objects::{BossIndex, GuildId, MemberId, RecordId};

use super::LedgerScope;

/// Damage record entity
///
/// Records are never edited; the newest one per boss defines that boss's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageRecord {
    pub id: RecordId,
    pub guild_id: GuildId,
    pub dataset: i32,
    pub member_id: MemberId,
    /// Who typed the report on the member's behalf
    pub proxy_id: Option<MemberId>,
    pub boss: BossIndex,
    pub cycle: i32,
    pub hp_before: i64,
    pub damage: i64,
    pub comment: Option<String>,
    /// Consumed a bonus attempt earned earlier the same day
    pub is_bonus_attempt: bool,
    /// A full attempt that finished the boss and earned a bonus attempt
    pub earns_bonus: bool,
    /// Admin correction of a boss's state, not a real hit
    pub is_override: bool,
    pub recorded_at: DateTime<Utc>,
}

impl DamageRecord {
    pub fn scope(&self) -> LedgerScope {
        LedgerScope {
            guild_id: self.guild_id,
            dataset: self.dataset,
        }
    }

    #[inline]
    pub fn is_kill(&self) -> bool {
        self.damage == self.hp_before
    }

    #[inline]
    pub fn hp_after(&self) -> i64 {
        self.hp_before - self.damage
    }

    /// Whether `member` reported this hit, directly or as proxy
    pub fn involves(&self, member: MemberId) -> bool {
        self.member_id == member || self.proxy_id == Some(member)
    }
}
