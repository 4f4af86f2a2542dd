//! Per-region boss HP tables and stage breakpoints

use serde::{Deserialize, Serialize};

use super::boss::{BossIndex, BOSS_COUNT};
use super::region::Region;

/// Invalid table contents or a lookup outside the table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BossTableError {
    #[error("cycle {0} precedes the first stage")]
    CycleBeforeFirstStage(i32),

    #[error("cycle {0} has no successor")]
    CycleOverflow(i32),

    #[error("{region}: {reason}")]
    Invalid { region: String, reason: String },
}

/// Highest cycle a boss may be forced to
pub const MAX_CYCLE: i32 = 10_000;

/// The cycle a boss moves to once killed at `cycle`
pub fn next_cycle(cycle: i32) -> Result<i32, BossTableError> {
    cycle
        .checked_add(1)
        .ok_or(BossTableError::CycleOverflow(cycle))
}

/// HP table of one region
///
/// `stage_starts[i]` is the first cycle of stage `i + 1`; `hp[i]` holds the
/// max HP of the five bosses during that stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossTable {
    pub stage_starts: Vec<i32>,
    pub hp: Vec<[i64; BOSS_COUNT]>,
}

impl BossTable {
    pub fn new(stage_starts: Vec<i32>, hp: Vec<[i64; BOSS_COUNT]>) -> Self {
        Self { stage_starts, hp }
    }

    pub fn stage_count(&self) -> i32 {
        self.stage_starts.len() as i32
    }

    /// First cycle of a 1-based stage, `None` past the last stage
    pub fn stage_start(&self, stage: i32) -> Option<i32> {
        let slot = usize::try_from(stage.checked_sub(1)?).ok()?;
        self.stage_starts.get(slot).copied()
    }

    /// 1-based stage containing `cycle`: the last breakpoint not after it
    pub fn stage_for_cycle(&self, cycle: i32) -> Result<i32, BossTableError> {
        self.stage_starts
            .iter()
            .rposition(|&start| start <= cycle)
            .map(|slot| slot as i32 + 1)
            .ok_or(BossTableError::CycleBeforeFirstStage(cycle))
    }

    /// Max HP of `boss` during `stage`; stages past the table reuse the last row
    pub fn max_hp(&self, stage: i32, boss: BossIndex) -> i64 {
        let slot = usize::try_from(stage - 1).unwrap_or(0);
        self.hp
            .get(slot)
            .or_else(|| self.hp.last())
            .map_or(0, |row| row[boss.slot()])
    }

    pub fn max_hp_for_cycle(&self, cycle: i32, boss: BossIndex) -> Result<i64, BossTableError> {
        Ok(self.max_hp(self.stage_for_cycle(cycle)?, boss))
    }

    pub fn validate(&self, region: Region) -> Result<(), BossTableError> {
        let invalid = |reason: &str| BossTableError::Invalid {
            region: region.to_string(),
            reason: reason.to_string(),
        };

        if self.stage_starts.first() != Some(&1) {
            return Err(invalid("first stage must start at cycle 1"));
        }
        if self.stage_starts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("stage starts must be strictly ascending"));
        }
        if self.hp.len() != self.stage_starts.len() {
            return Err(invalid("one hp row is required per stage"));
        }
        if self.hp.iter().flatten().any(|&hp| hp <= 0) {
            return Err(invalid("boss hp must be positive"));
        }
        Ok(())
    }
}

/// HP tables of every region, loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossTables {
    pub jp: BossTable,
    pub tw: BossTable,
    pub cn: BossTable,
}

impl BossTables {
    pub fn for_region(&self, region: Region) -> &BossTable {
        match region {
            Region::Jp => &self.jp,
            Region::Tw => &self.tw,
            Region::Cn => &self.cn,
        }
    }

    pub fn validate(&self) -> Result<(), BossTableError> {
        Region::ALL
            .iter()
            .try_for_each(|&region| self.for_region(region).validate(region))
    }
}
