//! Daily attempt quota, replayed from the day's damage records

use serde::{Deserialize, Serialize};

use crate::entities::DamageRecord;

/// A member's attempts within one battle day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatus {
    /// Full attempts used
    pub challenged: i32,
    pub bonus_used: i32,
    /// Bonus attempts earned and not yet used
    pub bonus_remaining: i32,
    pub last_was_bonus: bool,
    pub used_sl: bool,
}

impl DailyStatus {
    /// Replay `records` (chronological, one member, one day)
    ///
    /// Overrides are admin corrections and do not count.
    pub fn replay<'a, I>(records: I, used_sl: bool) -> Self
    where
        I: IntoIterator<Item = &'a DamageRecord>,
    {
        let mut status = Self {
            used_sl,
            ..Self::default()
        };

        for record in records.into_iter().filter(|r| !r.is_override) {
            if record.earns_bonus {
                status.bonus_remaining += 1;
            }
            if record.is_bonus_attempt {
                status.bonus_used += 1;
                status.bonus_remaining -= 1;
            } else {
                status.challenged += 1;
            }
            status.last_was_bonus = record.is_bonus_attempt;
        }
        status
    }

    /// Whether the next hit of this member should consume a bonus attempt
    pub fn next_hit_is_bonus(&self, force_full_attempt: bool) -> bool {
        self.bonus_remaining > 0 && !force_full_attempt
    }
}

/// Guild-wide totals of one battle day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildTotals {
    pub full_attempts: i32,
    pub bonus_outstanding: i32,
}

impl GuildTotals {
    pub fn replay<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DamageRecord>,
    {
        let status = DailyStatus::replay(records, false);
        Self {
            full_attempts: status.challenged,
            bonus_outstanding: status.bonus_remaining,
        }
    }
}
