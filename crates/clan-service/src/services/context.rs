//! Service context - dependency container for services
//!
//! Built once at startup and shared by every request handler and the chat
//! front-end. Holds the storage ports, the immutable boss tables, the clock,
//! the record id generator, the notifier and the per-guild lock table.

use std::sync::Arc;

use clan_core::traits::{Clock, GuildRepository, LedgerRepository, MemberRepository, Notifier};
use clan_core::{
    BossBoard, BossTable, BossTables, Guild, GuildId, MemberId, Notification, RecordId,
    RecordIdGenerator, Region,
};
use clan_db::MemoryStore;

use super::error::{ServiceError, ServiceResult};
use super::locks::GuildLocks;
use super::notification::relay;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    guild_repo: Arc<dyn GuildRepository>,
    member_repo: Arc<dyn MemberRepository>,
    ledger: Arc<dyn LedgerRepository>,

    // Static data
    boss_tables: Arc<BossTables>,

    // Services
    clock: Arc<dyn Clock>,
    id_generator: Arc<RecordIdGenerator>,
    notifier: Arc<dyn Notifier>,
    locks: GuildLocks,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        guild_repo: Arc<dyn GuildRepository>,
        member_repo: Arc<dyn MemberRepository>,
        ledger: Arc<dyn LedgerRepository>,
        boss_tables: Arc<BossTables>,
        clock: Arc<dyn Clock>,
        id_generator: Arc<RecordIdGenerator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            guild_repo,
            member_repo,
            ledger,
            boss_tables,
            clock,
            id_generator,
            notifier,
            locks: GuildLocks::new(),
        }
    }

    // === Repositories ===

    /// Get the guild repository
    pub fn guild_repo(&self) -> &dyn GuildRepository {
        self.guild_repo.as_ref()
    }

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the ledger repository
    pub fn ledger(&self) -> &dyn LedgerRepository {
        self.ledger.as_ref()
    }

    // === Boss tables ===

    pub fn boss_tables(&self) -> &BossTables {
        self.boss_tables.as_ref()
    }

    /// HP table of a region
    pub fn table(&self, region: Region) -> &BossTable {
        self.boss_tables.for_region(region)
    }

    // === Services ===

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn locks(&self) -> &GuildLocks {
        &self.locks
    }

    /// Generate a new record ID
    pub fn generate_id(&self) -> RecordId {
        self.id_generator.next_id()
    }

    // === Shared lookups ===

    /// Load a guild or fail with `NotFound`
    pub async fn load_guild(&self, guild_id: GuildId) -> ServiceResult<Guild> {
        self.guild_repo
            .find_by_id(guild_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Guild", guild_id))
    }

    /// Load a guild the caller belongs to; outsiders get `PermissionDenied`
    pub async fn require_member(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> ServiceResult<Guild> {
        let guild = self.load_guild(guild_id).await?;
        if !guild.is_member(member_id) {
            tracing::debug!(guild_id = %guild_id, member_id = %member_id, "Outsider refused");
            return Err(ServiceError::permission_denied(format!(
                "member {member_id} is not in guild {guild_id}"
            )));
        }
        Ok(guild)
    }

    /// Current boss board of the guild's live dataset
    pub async fn board(&self, guild: &Guild) -> ServiceResult<BossBoard<'_>> {
        let latest = self.ledger.latest_per_boss(guild.scope()).await?;
        Ok(BossBoard::derive(
            guild.layout(),
            self.table(guild.region),
            &latest,
        )?)
    }

    /// Relay notifications; call only after the guild lock is released
    pub async fn deliver(&self, notifications: Vec<Notification>) {
        if !notifications.is_empty() {
            relay(self.notifier.as_ref(), notifications).await;
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("clock", &self.clock)
            .field("locks", &self.locks.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    guild_repo: Option<Arc<dyn GuildRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    ledger: Option<Arc<dyn LedgerRepository>>,
    boss_tables: Option<Arc<BossTables>>,
    clock: Option<Arc<dyn Clock>>,
    id_generator: Option<Arc<RecordIdGenerator>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guild_repo(mut self, repo: Arc<dyn GuildRepository>) -> Self {
        self.guild_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn ledger(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger = Some(repo);
        self
    }

    /// Use one in-memory store for guilds, members and the ledger
    pub fn memory_store(self, store: MemoryStore) -> Self {
        self.guild_repo(Arc::new(store.clone()))
            .member_repo(Arc::new(store.clone()))
            .ledger(Arc::new(store))
    }

    pub fn boss_tables(mut self, tables: Arc<BossTables>) -> Self {
        self.boss_tables = Some(tables);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, generator: Arc<RecordIdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::validation(format!("{name} is required"));
        Ok(ServiceContext::new(
            self.guild_repo.ok_or_else(|| missing("guild_repo"))?,
            self.member_repo.ok_or_else(|| missing("member_repo"))?,
            self.ledger.ok_or_else(|| missing("ledger"))?,
            self.boss_tables.ok_or_else(|| missing("boss_tables"))?,
            self.clock.ok_or_else(|| missing("clock"))?,
            self.id_generator.ok_or_else(|| missing("id_generator"))?,
            self.notifier.ok_or_else(|| missing("notifier"))?,
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};

    use clan_core::{
        DamageRecord, DomainError, LedgerMutation, LedgerScope, ManualClock, Member, MemberId,
        MutationPlan, RecordQuery, RepoResult, Reservation, ReservationQuery, SlQuery, SlUsage,
    };

    use crate::services::notification::TracingNotifier;

    /// 2024-05-01 12:00 JST, well inside a battle day
    pub(crate) fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap()
    }

    /// Small jp-like tables: stages start at cycles 1, 4 and 11
    pub(crate) fn tables() -> BossTables {
        let table = || {
            BossTable::new(
                vec![1, 4, 11],
                vec![
                    [100, 200, 300, 400, 500],
                    [1_000, 2_000, 3_000, 4_000, 5_000],
                    [10_000, 20_000, 30_000, 40_000, 50_000],
                ],
            )
        };
        BossTables {
            jp: table(),
            tw: table(),
            cn: table(),
        }
    }

    pub(crate) struct Fixture {
        pub ctx: ServiceContext,
        pub clock: Arc<ManualClock>,
        pub notifications: tokio::sync::mpsc::UnboundedReceiver<Notification>,
    }

    pub(crate) fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(noon()));
        let (notifier, notifications) = crate::services::notification::ChannelNotifier::new();
        let ctx = ServiceContextBuilder::new()
            .memory_store(MemoryStore::new())
            .boss_tables(Arc::new(tables()))
            .clock(clock.clone())
            .id_generator(Arc::new(RecordIdGenerator::new(1)))
            .notifier(Arc::new(notifier))
            .build()
            .unwrap();
        Fixture {
            ctx,
            clock,
            notifications,
        }
    }

    /// Ledger over a memory store whose writes can be made to fail
    pub(crate) struct FlakyLedger {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl FlakyLedger {
        pub(crate) fn fail_writes(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl LedgerRepository for FlakyLedger {
        async fn latest_per_boss(&self, scope: LedgerScope) -> RepoResult<Vec<DamageRecord>> {
            self.inner.latest_per_boss(scope).await
        }

        async fn find_records(
            &self,
            scope: LedgerScope,
            query: &RecordQuery,
        ) -> RepoResult<Vec<DamageRecord>> {
            self.inner.find_records(scope, query).await
        }

        async fn find_reservations(
            &self,
            scope: LedgerScope,
            query: &ReservationQuery,
        ) -> RepoResult<Vec<Reservation>> {
            self.inner.find_reservations(scope, query).await
        }

        async fn find_sl_usages(
            &self,
            scope: LedgerScope,
            query: &SlQuery,
        ) -> RepoResult<Vec<SlUsage>> {
            self.inner.find_sl_usages(scope, query).await
        }

        async fn apply(&self, scope: LedgerScope, plan: MutationPlan) -> RepoResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DomainError::DatabaseError("connection reset".to_string()));
            }
            self.inner.apply(scope, plan).await
        }

        async fn clear(&self, scope: LedgerScope) -> RepoResult<u64> {
            self.inner.clear(scope).await
        }
    }

    /// Like [`fixture`], with the ledger behind a switch
    pub(crate) fn flaky_fixture() -> (Fixture, Arc<FlakyLedger>) {
        let store = MemoryStore::new();
        let ledger = Arc::new(FlakyLedger {
            inner: store.clone(),
            failing: AtomicBool::new(false),
        });
        let clock = Arc::new(ManualClock::new(noon()));
        let (notifier, notifications) = crate::services::notification::ChannelNotifier::new();
        let ctx = ServiceContextBuilder::new()
            .memory_store(store)
            .ledger(ledger.clone())
            .boss_tables(Arc::new(tables()))
            .clock(clock.clone())
            .id_generator(Arc::new(RecordIdGenerator::new(1)))
            .notifier(Arc::new(notifier))
            .build()
            .unwrap();
        let fixture = Fixture {
            ctx,
            clock,
            notifications,
        };
        (fixture, ledger)
    }

    pub(crate) const GUILD: GuildId = GuildId::new(10);
    pub(crate) const ADMIN: MemberId = MemberId::new(1);

    #[test]
    fn test_builder_requires_every_dependency() {
        let err = ServiceContextBuilder::new()
            .memory_store(MemoryStore::new())
            .clock(Arc::new(ManualClock::new(noon())))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("boss_tables"));

        let ctx = ServiceContextBuilder::new()
            .memory_store(MemoryStore::new())
            .boss_tables(Arc::new(tables()))
            .clock(Arc::new(ManualClock::new(noon())))
            .id_generator(Arc::new(RecordIdGenerator::new(1)))
            .notifier(Arc::new(TracingNotifier))
            .build();
        assert!(ctx.is_ok());
    }

    #[tokio::test]
    async fn test_board_of_unknown_guild() {
        let fixture = fixture();
        let err = fixture.ctx.load_guild(GUILD).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_require_member_refuses_outsiders() {
        let fixture = fixture();
        let guild = Guild::new(GUILD, "Moonlight".to_string(), Region::Jp);
        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::CreateGuild(guild.clone()));
        plan.push(LedgerMutation::RegisterMember(Member::new(ADMIN, "leader".to_string())));
        plan.push(LedgerMutation::AddMembership(ADMIN));
        fixture.ctx.ledger().apply(guild.scope(), plan).await.unwrap();

        let found = fixture.ctx.require_member(GUILD, ADMIN).await.unwrap();
        assert_eq!(found.id, GUILD);

        let err = fixture
            .ctx
            .require_member(GUILD, MemberId::new(99))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = fixture
            .ctx
            .require_member(GuildId::new(404), ADMIN)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
