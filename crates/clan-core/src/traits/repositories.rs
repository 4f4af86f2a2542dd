//! Repository traits (ports) - the ledger store as the domain sees it
//!
//! Implementations live in `clan-db`. Every ledger query is confined to one
//! `(guild, dataset)` scope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::battle::{DayWindow, MutationPlan};
use crate::entities::{
    DamageRecord, Guild, LedgerScope, Member, Reservation, ReservationKind, SlUsage,
};
use crate::error::DomainError;
use crate::value_objects::{BossIndex, GuildId, MemberId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Guild Repository
// ============================================================================

#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// Find guild by ID, members and admins included
    async fn find_by_id(&self, id: GuildId) -> RepoResult<Option<Guild>>;

    /// List all guilds a member has joined
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Guild>>;

    /// Persist name, region, admins and active dataset
    async fn update(&self, guild: &Guild) -> RepoResult<()>;

    /// Delete a guild with its memberships and the ledger rows of every dataset
    async fn delete(&self, id: GuildId) -> RepoResult<()>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID, joined guilds included
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;

    /// Members of a guild in join order
    async fn find_by_guild(&self, guild_id: GuildId) -> RepoResult<Vec<Member>>;

    /// Create a new member identity outside any guild
    async fn create(&self, member: &Member) -> RepoResult<()>;

    /// Persist the profile (name)
    async fn update(&self, member: &Member) -> RepoResult<()>;

    /// Get password hash for web login
    async fn get_password_hash(&self, id: MemberId) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: MemberId, password_hash: &str) -> RepoResult<()>;

    /// Store or clear the web session token
    async fn set_session_token(&self, id: MemberId, token: Option<&str>) -> RepoResult<()>;

    /// Resolve a session token to its member
    async fn find_by_session_token(&self, token: &str) -> RepoResult<Option<MemberId>>;
}

// ============================================================================
// Ledger Repository
// ============================================================================

/// Filter for damage records
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub member: Option<MemberId>,
    pub boss: Option<BossIndex>,
    pub cycle: Option<i32>,
    /// Inclusive lower bound
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound
    pub until: Option<DateTime<Utc>>,
    pub newest_first: bool,
    pub limit: Option<i64>,
}

impl RecordQuery {
    pub fn member(mut self, member: MemberId) -> Self {
        self.member = Some(member);
        self
    }

    pub fn boss(mut self, boss: BossIndex) -> Self {
        self.boss = Some(boss);
        self
    }

    pub fn window(mut self, window: DayWindow) -> Self {
        self.since = Some(window.start);
        self.until = Some(window.end);
        self
    }

    /// Only the newest matching record
    pub fn latest(mut self) -> Self {
        self.newest_first = true;
        self.limit = Some(1);
        self
    }

    pub fn matches(&self, record: &DamageRecord) -> bool {
        self.member.map_or(true, |m| record.member_id == m)
            && self.boss.map_or(true, |b| record.boss == b)
            && self.cycle.map_or(true, |c| record.cycle == c)
            && self.since.map_or(true, |t| record.recorded_at >= t)
            && self.until.map_or(true, |t| record.recorded_at < t)
    }
}

/// Filter for reservations
#[derive(Debug, Clone, Default)]
pub struct ReservationQuery {
    pub kind: Option<ReservationKind>,
    pub member: Option<MemberId>,
    pub boss: Option<BossIndex>,
    pub cycle: Option<i32>,
}

impl ReservationQuery {
    pub fn of_kind(kind: ReservationKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn member(mut self, member: MemberId) -> Self {
        self.member = Some(member);
        self
    }

    pub fn boss(mut self, boss: BossIndex) -> Self {
        self.boss = Some(boss);
        self
    }

    pub fn matches(&self, entry: &Reservation) -> bool {
        self.kind.map_or(true, |k| entry.kind == k)
            && self.member.map_or(true, |m| entry.member_id == m)
            && self.boss.map_or(true, |b| entry.boss == b)
            && self.cycle.map_or(true, |c| entry.cycle == c)
    }
}

/// Filter for SL usages
#[derive(Debug, Clone, Default)]
pub struct SlQuery {
    pub member: Option<MemberId>,
    pub window: Option<DayWindow>,
}

impl SlQuery {
    pub fn matches(&self, usage: &SlUsage) -> bool {
        self.member.map_or(true, |m| usage.member_id == m)
            && self.window.map_or(true, |w| w.contains(usage.used_at))
    }
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// The newest damage record of each boss (at most five)
    async fn latest_per_boss(&self, scope: LedgerScope) -> RepoResult<Vec<DamageRecord>>;

    /// Damage records ordered by `(recorded_at, id)`, oldest first unless
    /// `newest_first` is set
    async fn find_records(
        &self,
        scope: LedgerScope,
        query: &RecordQuery,
    ) -> RepoResult<Vec<DamageRecord>>;

    /// Reservations ordered by creation
    async fn find_reservations(
        &self,
        scope: LedgerScope,
        query: &ReservationQuery,
    ) -> RepoResult<Vec<Reservation>>;

    /// SL usages ordered by time
    async fn find_sl_usages(&self, scope: LedgerScope, query: &SlQuery)
        -> RepoResult<Vec<SlUsage>>;

    /// Apply every mutation of the plan or none of them, roster changes of
    /// the scope's guild included
    async fn apply(&self, scope: LedgerScope, plan: MutationPlan) -> RepoResult<()>;

    /// Delete every ledger row of the scope; returns the number of rows removed
    async fn clear(&self, scope: LedgerScope) -> RepoResult<u64>;
}
