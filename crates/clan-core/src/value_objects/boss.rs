//! Boss index - one of the five bosses of a cycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bosses in one cycle
pub const BOSS_COUNT: usize = 5;

/// 1-based boss index (1..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct BossIndex(u8);

/// Boss index outside 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("boss index out of range: {0}")]
pub struct BossIndexError(pub i32);

impl BossIndex {
    pub const FIRST: BossIndex = BossIndex(1);

    pub fn new(index: i32) -> Result<Self, BossIndexError> {
        if (1..=BOSS_COUNT as i32).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(BossIndexError(index))
        }
    }

    #[inline]
    pub fn get(self) -> i32 {
        i32::from(self.0)
    }

    /// Zero-based position in per-boss arrays
    #[inline]
    pub fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn all() -> impl Iterator<Item = BossIndex> {
        (1..=BOSS_COUNT as u8).map(BossIndex)
    }
}

impl TryFrom<i32> for BossIndex {
    type Error = BossIndexError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BossIndex> for i32 {
    fn from(boss: BossIndex) -> Self {
        boss.get()
    }
}

impl fmt::Display for BossIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_index_range() {
        assert!(BossIndex::new(0).is_err());
        assert!(BossIndex::new(6).is_err());
        assert_eq!(BossIndex::new(5).unwrap().slot(), 4);
        assert_eq!(BossIndex::all().count(), BOSS_COUNT);
    }

    #[test]
    fn test_boss_index_serde() {
        let boss: BossIndex = serde_json::from_str("3").unwrap();
        assert_eq!(boss.get(), 3);
        assert!(serde_json::from_str::<BossIndex>("9").is_err());
    }
}
