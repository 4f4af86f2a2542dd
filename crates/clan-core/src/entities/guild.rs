//! Guild entity - one chat group sharing a boss-progress timeline

use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

use crate::value_objects::{BossLayout, GuildId, MemberId, Region};

/// Ledger partition key: rows of a guild within one dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerScope {
    pub guild_id: GuildId,
    pub dataset: i32,
}

/// Guild entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub region: Region,
    /// Join order is kept
    pub members: Vec<MemberId>,
    pub admins: Vec<MemberId>,
    pub active_dataset: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guild {
    /// Datasets a guild may switch between
    pub const DATASETS: RangeInclusive<i32> = 1..=10;

    pub fn new(id: GuildId, name: String, region: Region) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            region,
            members: Vec::new(),
            admins: Vec::new(),
            active_dataset: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn layout(&self) -> BossLayout {
        self.region.layout()
    }

    /// Scope of the live dataset
    pub fn scope(&self) -> LedgerScope {
        LedgerScope {
            guild_id: self.id,
            dataset: self.active_dataset,
        }
    }

    #[inline]
    pub fn is_member(&self, member_id: MemberId) -> bool {
        self.members.contains(&member_id)
    }

    #[inline]
    pub fn is_admin(&self, member_id: MemberId) -> bool {
        self.admins.contains(&member_id)
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Replace the admin set, dropping duplicates
    pub fn set_admins(&mut self, admins: Vec<MemberId>) {
        let mut unique = Vec::with_capacity(admins.len());
        for admin in admins {
            if !unique.contains(&admin) {
                unique.push(admin);
            }
        }
        self.admins = unique;
        self.updated_at = Utc::now();
    }

    /// Returns false if the dataset is outside [`Guild::DATASETS`]
    pub fn switch_dataset(&mut self, dataset: i32) -> bool {
        if !Self::DATASETS.contains(&dataset) {
            return false;
        }
        self.active_dataset = dataset;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild() -> Guild {
        Guild::new(GuildId::new(10), "Test Guild".to_string(), Region::Jp)
    }

    #[test]
    fn test_guild_creation() {
        let guild = guild();
        assert_eq!(guild.active_dataset, 1);
        assert!(guild.members.is_empty());
        assert_eq!(guild.layout(), BossLayout::MultiBoss);
        assert_eq!(guild.scope().dataset, 1);
    }

    #[test]
    fn test_switch_dataset_bounds() {
        let mut guild = guild();
        assert!(guild.switch_dataset(10));
        assert_eq!(guild.active_dataset, 10);
        assert!(!guild.switch_dataset(0));
        assert!(!guild.switch_dataset(11));
        assert_eq!(guild.active_dataset, 10);
    }

    #[test]
    fn test_set_admins_dedups() {
        let mut guild = guild();
        guild.set_admins(vec![MemberId::new(1), MemberId::new(2), MemberId::new(1)]);
        assert_eq!(guild.admins.len(), 2);
        assert!(guild.is_admin(MemberId::new(2)));
        assert!(!guild.is_admin(MemberId::new(3)));
    }
}
