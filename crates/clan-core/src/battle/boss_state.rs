//! Boss state derived from the damage ledger
//!
//! Nothing about a boss is stored: its cycle and HP follow from the newest
//! damage record on it.

use crate::entities::DamageRecord;
use crate::value_objects::{
    next_cycle, BossIndex, BossLayout, BossTable, BossTableError, BOSS_COUNT,
};

/// Live state of one boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossStatus {
    pub boss: BossIndex,
    pub cycle: i32,
    pub stage: i32,
    pub hp: i64,
    pub max_hp: i64,
}

impl BossStatus {
    /// A boss at full HP at the start of `cycle`
    pub fn fresh(boss: BossIndex, cycle: i32, table: &BossTable) -> Result<Self, BossTableError> {
        let stage = table.stage_for_cycle(cycle)?;
        let max_hp = table.max_hp(stage, boss);
        Ok(Self {
            boss,
            cycle,
            stage,
            hp: max_hp,
            max_hp,
        })
    }

    /// State of `boss` after its newest record, or cycle 1 when untouched
    pub fn derive(
        boss: BossIndex,
        latest: Option<&DamageRecord>,
        table: &BossTable,
    ) -> Result<Self, BossTableError> {
        let Some(record) = latest else {
            return Self::fresh(boss, 1, table);
        };

        if record.is_kill() {
            return Self::fresh(boss, next_cycle(record.cycle)?, table);
        }

        let stage = table.stage_for_cycle(record.cycle)?;
        Ok(Self {
            boss,
            cycle: record.cycle,
            stage,
            hp: record.hp_after(),
            max_hp: table.max_hp(stage, boss),
        })
    }
}

/// All five bosses of a guild plus the rules to decide what may be fought
#[derive(Debug, Clone)]
pub struct BossBoard<'t> {
    layout: BossLayout,
    table: &'t BossTable,
    statuses: [BossStatus; BOSS_COUNT],
}

impl<'t> BossBoard<'t> {
    /// Derive the board from the newest record of each boss
    ///
    /// `latest` may hold any records; only the newest per boss is used.
    pub fn derive(
        layout: BossLayout,
        table: &'t BossTable,
        latest: &[DamageRecord],
    ) -> Result<Self, BossTableError> {
        let mut newest: [Option<&DamageRecord>; BOSS_COUNT] = [None; BOSS_COUNT];
        for record in latest {
            let slot = &mut newest[record.boss.slot()];
            let replace = slot.map_or(true, |current| {
                (record.recorded_at, record.id) > (current.recorded_at, current.id)
            });
            if replace {
                *slot = Some(record);
            }
        }

        let mut statuses = [BossStatus::fresh(BossIndex::FIRST, 1, table)?; BOSS_COUNT];
        for boss in BossIndex::all() {
            statuses[boss.slot()] = BossStatus::derive(boss, newest[boss.slot()], table)?;
        }

        Ok(Self {
            layout,
            table,
            statuses,
        })
    }

    pub fn layout(&self) -> BossLayout {
        self.layout
    }

    pub fn table(&self) -> &'t BossTable {
        self.table
    }

    pub fn statuses(&self) -> &[BossStatus; BOSS_COUNT] {
        &self.statuses
    }

    pub fn status(&self, boss: BossIndex) -> &BossStatus {
        &self.statuses[boss.slot()]
    }

    pub fn cycles(&self) -> [i32; BOSS_COUNT] {
        self.statuses.map(|status| status.cycle)
    }

    pub fn max_challengeable_cycle(&self) -> i32 {
        self.layout
            .max_challengeable_cycle(&self.cycles(), self.table)
    }

    /// `cycle` is the boss's current cycle and within reach of the guild
    pub fn is_challengeable(&self, boss: BossIndex, cycle: i32) -> bool {
        self.layout
            .is_challengeable(&self.cycles(), boss, cycle, self.table)
    }

    /// Whether the boss can be hit at its current cycle
    pub fn is_open(&self, boss: BossIndex) -> bool {
        self.is_challengeable(boss, self.status(boss).cycle)
    }

    pub fn active_bosses(&self) -> Vec<BossIndex> {
        self.layout.active_bosses(&self.cycles(), self.table)
    }

    /// The board after `boss` is finished at its current cycle
    pub fn with_kill(&self, boss: BossIndex) -> Result<Self, BossTableError> {
        let mut next = self.clone();
        let cycle = next_cycle(self.status(boss).cycle)?;
        next.statuses[boss.slot()] = BossStatus::fresh(boss, cycle, self.table)?;
        Ok(next)
    }
}
