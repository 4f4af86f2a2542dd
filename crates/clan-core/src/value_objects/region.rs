//! Game server regions and the boss layout each one plays with

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::boss::{BossIndex, BOSS_COUNT};
use super::boss_table::BossTable;

/// Game server region of a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Jp,
    Tw,
    Cn,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Jp, Region::Tw, Region::Cn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jp => "jp",
            Self::Tw => "tw",
            Self::Cn => "cn",
        }
    }

    /// Offset of the region's local clock from UTC, in hours
    pub fn utc_offset_hours(&self) -> i32 {
        match self {
            Self::Jp => 9,
            Self::Tw | Self::Cn => 8,
        }
    }

    pub fn utc_offset(&self) -> Duration {
        Duration::hours(i64::from(self.utc_offset_hours()))
    }

    pub fn layout(&self) -> BossLayout {
        match self {
            Self::Cn => BossLayout::SingleRotatingBoss,
            Self::Jp | Self::Tw => BossLayout::MultiBoss,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a region name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region: {0}")]
pub struct RegionParseError(pub String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jp" => Ok(Self::Jp),
            "tw" => Ok(Self::Tw),
            "cn" => Ok(Self::Cn),
            other => Err(RegionParseError(other.to_string())),
        }
    }
}

/// How the bosses of a region may be fought
///
/// `MultiBoss`: all five bosses are open at once, bounded by the guild-wide
/// max challengeable cycle. `SingleRotatingBoss`: the five bosses are fought in
/// order, only one of them is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossLayout {
    MultiBoss,
    SingleRotatingBoss,
}

impl BossLayout {
    pub fn boss_count(&self) -> usize {
        BOSS_COUNT
    }

    /// The furthest cycle any boss may currently be fought at
    pub fn max_challengeable_cycle(&self, cycles: &[i32; BOSS_COUNT], table: &BossTable) -> i32 {
        match self {
            Self::MultiBoss => multi_boss_max_cycle(cycles, table),
            Self::SingleRotatingBoss => cycles.iter().copied().min().unwrap_or(1),
        }
    }

    /// Bosses that may be fought right now
    pub fn active_bosses(&self, cycles: &[i32; BOSS_COUNT], table: &BossTable) -> Vec<BossIndex> {
        let max_cycle = self.max_challengeable_cycle(cycles, table);
        match self {
            Self::MultiBoss => BossIndex::all()
                .filter(|boss| cycles[boss.slot()] <= max_cycle)
                .collect(),
            // lowest index among the slowest bosses
            Self::SingleRotatingBoss => BossIndex::all()
                .find(|boss| cycles[boss.slot()] == max_cycle)
                .into_iter()
                .collect(),
        }
    }

    /// Whether `boss` may be hit at `cycle`
    pub fn is_challengeable(
        &self,
        cycles: &[i32; BOSS_COUNT],
        boss: BossIndex,
        cycle: i32,
        table: &BossTable,
    ) -> bool {
        cycles[boss.slot()] == cycle && self.active_bosses(cycles, table).contains(&boss)
    }
}

fn multi_boss_max_cycle(cycles: &[i32; BOSS_COUNT], table: &BossTable) -> i32 {
    let min_cycle = cycles.iter().copied().min().unwrap_or(1);
    let max_cycle = cycles.iter().copied().max().unwrap_or(1);

    match max_cycle - min_cycle {
        2 => max_cycle - 1,
        1 => {
            let min_stage = table.stage_for_cycle(min_cycle).unwrap_or(1);
            match table.stage_start(min_stage + 1) {
                // slowest boss is already in the last stage
                None => max_cycle,
                Some(next_start) if next_start == max_cycle => min_cycle,
                Some(_) => max_cycle,
            }
        }
        _ => max_cycle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BossTable {
        BossTable::new(
            vec![1, 4, 11],
            vec![
                [100, 200, 300, 400, 500],
                [1_000, 2_000, 3_000, 4_000, 5_000],
                [10_000, 20_000, 30_000, 40_000, 50_000],
            ],
        )
    }

    #[test]
    fn test_region_offsets() {
        assert_eq!(Region::Jp.utc_offset_hours(), 9);
        assert_eq!(Region::Tw.utc_offset_hours(), 8);
        assert_eq!(Region::Cn.utc_offset_hours(), 8);
        assert_eq!(Region::Jp.utc_offset(), Duration::hours(9));
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("JP".parse::<Region>().unwrap(), Region::Jp);
        assert_eq!("cn".parse::<Region>().unwrap(), Region::Cn);
        assert!("kr".parse::<Region>().is_err());
        assert_eq!(Region::Cn.layout(), BossLayout::SingleRotatingBoss);
        assert_eq!(Region::Tw.layout(), BossLayout::MultiBoss);
    }

    #[test]
    fn test_max_cycle_spread_two() {
        let layout = BossLayout::MultiBoss;
        assert_eq!(layout.max_challengeable_cycle(&[3, 3, 3, 3, 1], &table()), 2);
    }

    #[test]
    fn test_max_cycle_spread_one_without_boundary() {
        let layout = BossLayout::MultiBoss;
        assert_eq!(layout.max_challengeable_cycle(&[2, 2, 2, 2, 1], &table()), 2);
    }

    #[test]
    fn test_max_cycle_spread_one_at_stage_boundary() {
        // cycle 4 starts stage 2, the slowest boss is still on cycle 3
        let layout = BossLayout::MultiBoss;
        assert_eq!(layout.max_challengeable_cycle(&[4, 4, 3, 4, 4], &table()), 3);
    }

    #[test]
    fn test_max_cycle_spread_one_in_last_stage() {
        let layout = BossLayout::MultiBoss;
        assert_eq!(layout.max_challengeable_cycle(&[12, 12, 11, 12, 12], &table()), 12);
    }

    #[test]
    fn test_max_cycle_no_spread() {
        let layout = BossLayout::MultiBoss;
        assert_eq!(layout.max_challengeable_cycle(&[5, 5, 5, 5, 5], &table()), 5);
    }

    #[test]
    fn test_multi_boss_challengeable() {
        let layout = BossLayout::MultiBoss;
        let cycles = [3, 3, 3, 3, 1];
        let boss1 = BossIndex::new(1).unwrap();
        let boss5 = BossIndex::new(5).unwrap();
        assert!(!layout.is_challengeable(&cycles, boss1, 3, &table()));
        assert!(layout.is_challengeable(&cycles, boss5, 1, &table()));
        assert!(!layout.is_challengeable(&cycles, boss5, 2, &table()));
    }

    #[test]
    fn test_single_rotating_only_one_active() {
        let layout = BossLayout::SingleRotatingBoss;
        let cycles = [2, 2, 1, 1, 1];
        let active = layout.active_bosses(&cycles, &table());
        assert_eq!(active, vec![BossIndex::new(3).unwrap()]);
        assert!(layout.is_challengeable(&cycles, BossIndex::new(3).unwrap(), 1, &table()));
        assert!(!layout.is_challengeable(&cycles, BossIndex::new(4).unwrap(), 1, &table()));
        assert!(!layout.is_challengeable(&cycles, BossIndex::new(1).unwrap(), 2, &table()));
    }
}
