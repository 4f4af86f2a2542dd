//! Battle service
//!
//! Every command that changes the live dataset runs under the guild lock:
//! load, check in a fixed order, build one mutation plan, apply it. Kill
//! notifications are relayed after the lock is released.

use std::iter;

use tracing::{info, instrument};

use clan_core::value_objects::{next_cycle, BossTableError};
use clan_core::{
    parse_amount, resolve_kill, BossIndex, CancelRejection, DailyStatus, DamageRecord, DayWindow,
    Guild, GuildId, GuildRejection, LedgerMutation, MemberId, MutationPlan, Notification,
    NotificationKind, QueueRejection, RecordId, RecordQuery, RecordRejection, Reservation,
    ReservationKind, ReservationQuery, SlQuery, SlRejection, SlUsage, SubscribeRejection,
    TreeRejection, UndoRejection,
};

use crate::dto::{
    BossStatusResponse, CommitRecordRequest, KillNoticeResponse, RecordReceipt, RecordResponse,
    RemindRequest, ReservationResponse, ReserveRequest, SlRequest, SlUsageResponse,
    SubscribeRequest, UndoRequest,
};

use super::context::ServiceContext;
use super::error::{reject, ServiceResult};
use super::guild::GuildOutcome;

/// Outcome of a battle command
pub type BattleOutcome<T, R> = ServiceResult<Result<T, R>>;

/// Battle service
pub struct BattleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BattleService<'a> {
    /// Create a new BattleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Damage records
    // ========================================================================

    /// Report a hit on a boss
    ///
    /// `actor` reports; the attempt belongs to `on_behalf_of` when set. A hit
    /// that brings the boss to zero is a kill: stale reservations are dropped
    /// in the same plan and the affected members are notified.
    #[instrument(skip(self, request), fields(boss = request.boss))]
    pub async fn commit_record(
        &self,
        guild_id: GuildId,
        actor: MemberId,
        request: CommitRecordRequest,
    ) -> BattleOutcome<RecordReceipt, RecordRejection> {
        let outcome = {
            let _guard = self.ctx.locks().acquire(guild_id).await;
            self.record_locked(guild_id, actor, request).await?
        };

        match outcome {
            Ok((receipt, notifications)) => {
                self.ctx.deliver(notifications).await;
                Ok(Ok(receipt))
            }
            Err(rejection) => Ok(reject(guild_id, rejection)),
        }
    }

    async fn record_locked(
        &self,
        guild_id: GuildId,
        actor: MemberId,
        request: CommitRecordRequest,
    ) -> BattleOutcome<(RecordReceipt, Vec<Notification>), RecordRejection> {
        let Ok(boss) = BossIndex::new(request.boss) else {
            return Ok(Err(RecordRejection::IllegalTargetBoss));
        };

        let guild = self.ctx.load_guild(guild_id).await?;
        let scope = guild.scope();
        let board = self.ctx.board(&guild).await?;
        let status = *board.status(boss);

        let damage = if request.kill {
            status.hp
        } else {
            match request.damage.as_deref().map(parse_amount) {
                Some(Ok(damage)) => damage,
                _ => return Ok(Err(RecordRejection::IllegalDamageFormat)),
            }
        };
        if damage > status.hp {
            return Ok(Err(RecordRejection::DamageExceedsHp));
        }
        if !board.is_open(boss) {
            return Ok(Err(RecordRejection::BossNotChallengeable));
        }

        let member = request.on_behalf_of.unwrap_or(actor);
        let proxy = (member != actor).then_some(actor);

        let entries = self
            .ctx
            .ledger()
            .find_reservations(scope, &ReservationQuery::default())
            .await?;
        if entries
            .iter()
            .any(|e| e.is(ReservationKind::Tree, member) && e.boss != boss)
        {
            return Ok(Err(RecordRejection::OnAnotherTree));
        }
        if !guild.is_member(member) || proxy.is_some_and(|p| !guild.is_member(p)) {
            return Ok(Err(RecordRejection::MemberNotInClan));
        }

        let mut plan = MutationPlan::new();
        for who in iter::once(member).chain(proxy) {
            plan.delete_reservations(
                entries
                    .iter()
                    .filter(|e| e.member_id == who && settled_by_hit(e, boss, status.cycle))
                    .map(|e| e.id),
            );
        }

        let now = self.ctx.clock().now();
        let window = DayWindow::containing(guild.region, now);
        let today = self
            .ctx
            .ledger()
            .find_records(scope, &RecordQuery::default().member(member).window(window))
            .await?;
        let daily = DailyStatus::replay(&today, false);
        let is_bonus_attempt = daily.next_hit_is_bonus(request.force_full_attempt);
        let is_kill = damage == status.hp;

        let record = DamageRecord {
            id: self.ctx.generate_id(),
            guild_id,
            dataset: scope.dataset,
            member_id: member,
            proxy_id: proxy,
            boss,
            cycle: status.cycle,
            hp_before: status.hp,
            damage,
            comment: request.comment,
            is_bonus_attempt,
            earns_bonus: is_kill && !is_bonus_attempt,
            is_override: false,
            recorded_at: now,
        };

        let (boss_after, notice) = if is_kill {
            let after = match board.with_kill(boss) {
                Ok(after) => after,
                Err(BossTableError::CycleOverflow(_)) => {
                    return Ok(reject(guild_id, RecordRejection::IllegalCycle));
                }
                Err(e) => return Err(e.into()),
            };
            let surviving: Vec<Reservation> = entries
                .iter()
                .filter(|e| !plan.deletes_reservation(e.id))
                .cloned()
                .collect();
            let excluded: Vec<MemberId> = iter::once(member).chain(proxy).collect();
            let resolution = resolve_kill(&board, boss, &surviving, &excluded)?;
            plan.delete_reservations(resolution.stale.iter().copied());

            (
                BossStatusResponse::from_board(&after, after.status(boss)),
                Some(resolution.notice),
            )
        } else {
            let mut hit = status;
            hit.hp -= damage;
            (BossStatusResponse::from_board(&board, &hit), None)
        };

        plan.push(LedgerMutation::InsertRecord(record.clone()));
        self.ctx.ledger().apply(scope, plan).await?;

        info!(
            guild_id = %guild_id,
            member_id = %member,
            boss = %boss,
            cycle = record.cycle,
            damage,
            kill = is_kill,
            bonus = is_bonus_attempt,
            "Damage recorded"
        );

        let notifications = notice
            .as_ref()
            .map(|notice| Notification::from_kill(guild_id, notice))
            .unwrap_or_default();
        let receipt = RecordReceipt {
            record: RecordResponse::from(&record),
            boss: boss_after,
            kill: notice.as_ref().map(KillNoticeResponse::from),
        };
        Ok(Ok((receipt, notifications)))
    }

    /// Undo the newest record
    ///
    /// With a boss: the newest record on it, which only its owner, its
    /// reporter and admins may undo. Without: the actor's own newest record,
    /// as long as nobody has hit that boss since.
    #[instrument(skip(self, request))]
    pub async fn undo_last_record(
        &self,
        guild_id: GuildId,
        actor: MemberId,
        request: UndoRequest,
    ) -> BattleOutcome<RecordResponse, UndoRejection> {
        let boss = match request.boss.map(BossIndex::new).transpose() {
            Ok(boss) => boss,
            Err(_) => return Ok(Err(UndoRejection::IllegalTargetBoss)),
        };

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        let scope = guild.scope();
        if !guild.is_member(actor) {
            return Ok(reject(guild_id, UndoRejection::MemberNotInClan));
        }

        let ledger = self.ctx.ledger();
        let record = match boss {
            Some(boss) => {
                let newest = ledger
                    .find_records(scope, &RecordQuery::default().boss(boss).latest())
                    .await?;
                let Some(record) = newest.into_iter().next() else {
                    return Ok(reject(guild_id, UndoRejection::NoRecord));
                };
                if !record.involves(actor) && !guild.is_admin(actor) {
                    return Ok(reject(guild_id, UndoRejection::NotPermitted));
                }
                record
            }
            None => {
                let mine = ledger
                    .find_records(scope, &RecordQuery::default().member(actor).latest())
                    .await?;
                let Some(record) = mine.into_iter().next() else {
                    return Ok(reject(guild_id, UndoRejection::NoRecord));
                };
                let newest = ledger
                    .find_records(scope, &RecordQuery::default().boss(record.boss).latest())
                    .await?;
                if newest.first().map(|r| r.id) != Some(record.id) {
                    return Ok(reject(guild_id, UndoRejection::SupersededByNewerRecord));
                }
                record
            }
        };

        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::DeleteRecord(record.id));
        ledger.apply(scope, plan).await?;

        info!(
            guild_id = %guild_id,
            record_id = %record.id,
            boss = %record.boss,
            actor = %actor,
            "Record undone"
        );
        Ok(Ok(RecordResponse::from(&record)))
    }

    // ========================================================================
    // Queue and tree
    // ========================================================================

    /// Announce that the member is fighting a boss now
    #[instrument(skip(self, request), fields(boss = request.boss))]
    pub async fn commit_queue(
        &self,
        guild_id: GuildId,
        member: MemberId,
        request: ReserveRequest,
    ) -> BattleOutcome<ReservationResponse, QueueRejection> {
        let Ok(boss) = BossIndex::new(request.boss) else {
            return Ok(Err(QueueRejection::IllegalTargetBoss));
        };

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        let board = self.ctx.board(&guild).await?;
        if !board.is_open(boss) {
            return Ok(reject(guild_id, QueueRejection::BossNotChallengeable));
        }

        let own = self.own_entries(&guild, member).await?;
        let tree = own.iter().find(|e| e.kind == ReservationKind::Tree);
        if tree.is_some_and(|t| t.boss != boss) {
            return Ok(reject(guild_id, QueueRejection::OnAnotherTree));
        }
        if !guild.is_member(member) {
            return Ok(reject(guild_id, QueueRejection::MemberNotInClan));
        }
        if tree.is_some() {
            return Ok(reject(guild_id, QueueRejection::AlreadyOnTree));
        }
        if own.iter().any(|e| e.kind == ReservationKind::Queue) {
            return Ok(reject(guild_id, QueueRejection::AlreadyQueued));
        }

        let cycle = board.status(boss).cycle;
        let entry = self.entry(&guild, ReservationKind::Queue, member, boss, cycle, request.comment);

        let mut plan = MutationPlan::new();
        plan.delete_reservations(subscriptions_on(&own, boss, cycle));
        plan.push(LedgerMutation::InsertReservation(entry.clone()));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(guild_id = %guild_id, member_id = %member, boss = %boss, cycle, "Queued");
        Ok(Ok(ReservationResponse::from(&entry)))
    }

    /// Stop fighting without reporting damage
    #[instrument(skip(self))]
    pub async fn cancel_queue(
        &self,
        guild_id: GuildId,
        member: MemberId,
    ) -> BattleOutcome<(), CancelRejection> {
        self.cancel_kind(guild_id, member, ReservationKind::Queue).await
    }

    #[instrument(skip(self, comment))]
    pub async fn update_queue_comment(
        &self,
        guild_id: GuildId,
        member: MemberId,
        comment: Option<String>,
    ) -> BattleOutcome<ReservationResponse, CancelRejection> {
        self.replace_comment(guild_id, member, ReservationKind::Queue, comment)
            .await
    }

    /// Hang on a boss, waiting for someone else to kill it
    ///
    /// A queue on the same boss becomes the tree.
    #[instrument(skip(self, request), fields(boss = request.boss))]
    pub async fn commit_tree(
        &self,
        guild_id: GuildId,
        member: MemberId,
        request: ReserveRequest,
    ) -> BattleOutcome<ReservationResponse, TreeRejection> {
        let Ok(boss) = BossIndex::new(request.boss) else {
            return Ok(Err(TreeRejection::IllegalTargetBoss));
        };

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_member(member) {
            return Ok(reject(guild_id, TreeRejection::MemberNotInClan));
        }
        let board = self.ctx.board(&guild).await?;
        if !board.is_open(boss) {
            return Ok(reject(guild_id, TreeRejection::BossNotChallengeable));
        }

        let own = self.own_entries(&guild, member).await?;
        if own.iter().any(|e| e.kind == ReservationKind::Tree) {
            return Ok(reject(guild_id, TreeRejection::AlreadyOnTree));
        }
        let queue = own.iter().find(|e| e.kind == ReservationKind::Queue);
        if queue.is_some_and(|q| q.boss != boss) {
            return Ok(reject(guild_id, TreeRejection::OnAnotherTree));
        }

        let cycle = board.status(boss).cycle;
        let comment = request
            .comment
            .or_else(|| queue.and_then(|q| q.comment.clone()));
        let entry = self.entry(&guild, ReservationKind::Tree, member, boss, cycle, comment);

        let mut plan = MutationPlan::new();
        plan.delete_reservations(subscriptions_on(&own, boss, cycle));
        plan.delete_reservations(queue.map(|q| q.id));
        plan.push(LedgerMutation::InsertReservation(entry.clone()));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(guild_id = %guild_id, member_id = %member, boss = %boss, cycle, "On tree");
        Ok(Ok(ReservationResponse::from(&entry)))
    }

    /// Climb down from the tree
    #[instrument(skip(self))]
    pub async fn cancel_tree(
        &self,
        guild_id: GuildId,
        member: MemberId,
    ) -> BattleOutcome<(), CancelRejection> {
        self.cancel_kind(guild_id, member, ReservationKind::Tree).await
    }

    #[instrument(skip(self, comment))]
    pub async fn update_tree_comment(
        &self,
        guild_id: GuildId,
        member: MemberId,
        comment: Option<String>,
    ) -> BattleOutcome<ReservationResponse, CancelRejection> {
        self.replace_comment(guild_id, member, ReservationKind::Tree, comment)
            .await
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Ask to be told when a boss reaches a cycle
    ///
    /// Without a cycle: the boss's current one if the guild has not reached
    /// it yet, otherwise the next.
    #[instrument(skip(self, request), fields(boss = request.boss))]
    pub async fn commit_subscribe(
        &self,
        guild_id: GuildId,
        member: MemberId,
        request: SubscribeRequest,
    ) -> BattleOutcome<ReservationResponse, SubscribeRejection> {
        let Ok(boss) = BossIndex::new(request.boss) else {
            return Ok(Err(SubscribeRejection::IllegalTargetBoss));
        };

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        let board = self.ctx.board(&guild).await?;
        let current = board.status(boss).cycle;
        let cycle = match request.cycle {
            Some(cycle) => cycle,
            None if board.max_challengeable_cycle() < current => current,
            None => match next_cycle(current) {
                Ok(next) => next,
                Err(_) => return Ok(reject(guild_id, SubscribeRejection::IllegalCycle)),
            },
        };

        if cycle < 1 {
            return Ok(reject(guild_id, SubscribeRejection::IllegalCycle));
        }
        if !guild.is_member(member) {
            return Ok(reject(guild_id, SubscribeRejection::MemberNotInClan));
        }
        let own = self.own_entries(&guild, member).await?;
        if own
            .iter()
            .any(|e| e.kind == ReservationKind::Queue && e.boss == boss)
        {
            return Ok(reject(guild_id, SubscribeRejection::AlreadyQueued));
        }
        if subscriptions_on(&own, boss, cycle).next().is_some() {
            return Ok(reject(guild_id, SubscribeRejection::AlreadySubscribed));
        }
        if cycle < current {
            return Ok(reject(guild_id, SubscribeRejection::CycleAlreadyKilled));
        }

        let entry = self.entry(
            &guild,
            ReservationKind::Subscribe,
            member,
            boss,
            cycle,
            request.comment,
        );
        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::InsertReservation(entry.clone()));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(guild_id = %guild_id, member_id = %member, boss = %boss, cycle, "Subscribed");
        Ok(Ok(ReservationResponse::from(&entry)))
    }

    /// Drop the member's subscriptions to a boss, or only the one at `cycle`
    #[instrument(skip(self))]
    pub async fn cancel_subscribe(
        &self,
        guild_id: GuildId,
        member: MemberId,
        boss: i32,
        cycle: Option<i32>,
    ) -> BattleOutcome<usize, CancelRejection> {
        let Ok(boss) = BossIndex::new(boss) else {
            return Ok(Err(CancelRejection::IllegalTargetBoss));
        };

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_member(member) {
            return Ok(reject(guild_id, CancelRejection::MemberNotInClan));
        }

        let own = self.own_entries(&guild, member).await?;
        let ids: Vec<_> = own
            .iter()
            .filter(|e| e.kind == ReservationKind::Subscribe && e.boss == boss)
            .filter(|e| cycle.map_or(true, |c| e.cycle == c))
            .map(|e| e.id)
            .collect();
        if ids.is_empty() {
            return Ok(reject(guild_id, CancelRejection::NoSuchEntry));
        }

        let dropped = ids.len();
        let mut plan = MutationPlan::new();
        plan.delete_reservations(ids);
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(guild_id = %guild_id, member_id = %member, boss = %boss, dropped, "Unsubscribed");
        Ok(Ok(dropped))
    }

    // ========================================================================
    // SL
    // ========================================================================

    /// Spend the once-a-day SL
    ///
    /// With a boss the member also leaves any tree they are on.
    #[instrument(skip(self, request))]
    pub async fn commit_sl(
        &self,
        guild_id: GuildId,
        actor: MemberId,
        request: SlRequest,
    ) -> BattleOutcome<SlUsageResponse, SlRejection> {
        let boss = match request.boss.map(BossIndex::new).transpose() {
            Ok(boss) => boss,
            Err(_) => return Ok(Err(SlRejection::IllegalTargetBoss)),
        };
        let member = request.on_behalf_of.unwrap_or(actor);
        let proxy = (member != actor).then_some(actor);

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        let scope = guild.scope();
        if !guild.is_member(member) || proxy.is_some_and(|p| !guild.is_member(p)) {
            return Ok(reject(guild_id, SlRejection::MemberNotInClan));
        }

        let now = self.ctx.clock().now();
        let used = self
            .ctx
            .ledger()
            .find_sl_usages(
                scope,
                &SlQuery {
                    member: Some(member),
                    window: Some(DayWindow::containing(guild.region, now)),
                },
            )
            .await?;
        if !used.is_empty() {
            return Ok(reject(guild_id, SlRejection::AlreadyUsed));
        }

        let mut plan = MutationPlan::new();
        let mut cycle = None;
        if let Some(boss) = boss {
            let board = self.ctx.board(&guild).await?;
            if !board.is_open(boss) {
                return Ok(reject(guild_id, SlRejection::BossNotChallengeable));
            }
            cycle = Some(board.status(boss).cycle);

            let own = self.own_entries(&guild, member).await?;
            plan.delete_reservations(
                own.iter()
                    .filter(|e| e.kind == ReservationKind::Tree)
                    .map(|e| e.id),
            );
        }

        let usage = SlUsage {
            id: self.ctx.generate_id(),
            guild_id,
            dataset: scope.dataset,
            member_id: member,
            proxy_id: proxy,
            boss,
            cycle,
            comment: request.comment,
            used_at: now,
        };
        plan.push(LedgerMutation::InsertSl(usage.clone()));
        self.ctx.ledger().apply(scope, plan).await?;

        info!(guild_id = %guild_id, member_id = %member, "SL used");
        Ok(Ok(SlUsageResponse::from(&usage)))
    }

    // ========================================================================
    // Reminders
    // ========================================================================

    /// Ask members to attack (admin only); returns who will be reminded
    #[instrument(skip(self, request))]
    pub async fn remind_members(
        &self,
        guild_id: GuildId,
        actor: MemberId,
        request: RemindRequest,
    ) -> GuildOutcome<Vec<MemberId>> {
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }

        let mut recipients: Vec<MemberId> = Vec::with_capacity(request.member_ids.len());
        for member in request.member_ids {
            if guild.is_member(member) && !recipients.contains(&member) {
                recipients.push(member);
            }
        }
        if recipients.is_empty() {
            return Ok(reject(guild_id, GuildRejection::MemberNotInClan));
        }

        self.ctx
            .deliver(vec![Notification {
                guild_id,
                recipients: recipients.clone(),
                kind: NotificationKind::Reminder { from: actor },
            }])
            .await;

        info!(guild_id = %guild_id, count = recipients.len(), "Reminder sent");
        Ok(Ok(recipients))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn own_entries(&self, guild: &Guild, member: MemberId) -> ServiceResult<Vec<Reservation>> {
        Ok(self
            .ctx
            .ledger()
            .find_reservations(guild.scope(), &ReservationQuery::default().member(member))
            .await?)
    }

    fn entry(
        &self,
        guild: &Guild,
        kind: ReservationKind,
        member: MemberId,
        boss: BossIndex,
        cycle: i32,
        comment: Option<String>,
    ) -> Reservation {
        Reservation {
            id: self.ctx.generate_id(),
            kind,
            guild_id: guild.id,
            dataset: guild.active_dataset,
            member_id: member,
            boss,
            cycle,
            comment,
            created_at: self.ctx.clock().now(),
        }
    }

    async fn cancel_kind(
        &self,
        guild_id: GuildId,
        member: MemberId,
        kind: ReservationKind,
    ) -> BattleOutcome<(), CancelRejection> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_member(member) {
            return Ok(reject(guild_id, CancelRejection::MemberNotInClan));
        }

        let own = self.own_entries(&guild, member).await?;
        let Some(entry) = own.iter().find(|e| e.kind == kind) else {
            return Ok(reject(guild_id, CancelRejection::NoSuchEntry));
        };

        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::DeleteReservation(entry.id));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(guild_id = %guild_id, member_id = %member, kind = %kind, "Reservation cancelled");
        Ok(Ok(()))
    }

    /// Rewrite the comment of the member's queue or tree, keeping its id
    async fn replace_comment(
        &self,
        guild_id: GuildId,
        member: MemberId,
        kind: ReservationKind,
        comment: Option<String>,
    ) -> BattleOutcome<ReservationResponse, CancelRejection> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_member(member) {
            return Ok(reject(guild_id, CancelRejection::MemberNotInClan));
        }

        let own = self.own_entries(&guild, member).await?;
        let Some(current) = own.into_iter().find(|e| e.kind == kind) else {
            return Ok(reject(guild_id, CancelRejection::NoSuchEntry));
        };
        let updated = Reservation { comment, ..current };

        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::DeleteReservation(updated.id));
        plan.push(LedgerMutation::InsertReservation(updated.clone()));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        Ok(Ok(ReservationResponse::from(&updated)))
    }
}

/// Entries a hit on `boss` at `cycle` settles for their owner
fn settled_by_hit(entry: &Reservation, boss: BossIndex, cycle: i32) -> bool {
    match entry.kind {
        ReservationKind::Tree => true,
        ReservationKind::Queue => entry.boss == boss,
        ReservationKind::Subscribe => entry.boss == boss && entry.cycle == cycle,
    }
}

fn subscriptions_on(
    entries: &[Reservation],
    boss: BossIndex,
    cycle: i32,
) -> impl Iterator<Item = RecordId> + '_ {
    entries
        .iter()
        .filter(move |e| {
            e.kind == ReservationKind::Subscribe && e.boss == boss && e.cycle == cycle
        })
        .map(|e| e.id)
}
