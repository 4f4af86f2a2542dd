//! Per-guild command serialization
//!
//! Every mutating command holds its guild's lock from the first ledger read to
//! the final write. Guilds never contend with each other.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use clan_core::GuildId;

/// Lazily created async mutex per guild
#[derive(Debug, Clone, Default)]
pub struct GuildLocks {
    locks: Arc<DashMap<GuildId, Arc<Mutex<()>>>>,
}

impl GuildLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the guild
    pub async fn acquire(&self, guild_id: GuildId) -> OwnedMutexGuard<()> {
        // clone the Arc out so the shard lock is not held across the await
        let lock = self
            .locks
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock of a deleted guild
    pub fn forget(&self, guild_id: GuildId) {
        self.locks.remove(&guild_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_guild_is_serialized() {
        let locks = GuildLocks::new();
        let guard = locks.acquire(GuildId::new(1)).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(GuildId::new(1)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_guilds_are_independent() {
        let locks = GuildLocks::new();
        let _first = locks.acquire(GuildId::new(1)).await;
        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(GuildId::new(2)),
        )
        .await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);

        locks.forget(GuildId::new(2));
        assert_eq!(locks.len(), 1);
    }
}
