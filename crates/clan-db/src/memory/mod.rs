//! In-memory ledger store
//!
//! Implements every repository port over one shared state. Used when no
//! `DATABASE_URL` is configured and by the service and API tests. `apply`
//! writes each mutation in place under the write lock and keeps its inverse;
//! on the first failure the inverses run backwards, so a plan costs its own
//! size rather than a copy of the store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::instrument;

use clan_core::traits::{
    GuildRepository, LedgerRepository, MemberRepository, RecordQuery, RepoResult,
    ReservationQuery, SlQuery,
};
use clan_core::{
    DamageRecord, DomainError, Guild, GuildId, LedgerMutation, LedgerScope, Member, MemberId,
    MutationPlan, Reservation, ReservationKind, SlUsage,
};

#[derive(Debug, Clone)]
struct MemberRow {
    member: Member,
    password_hash: Option<String>,
    session_token: Option<String>,
}

impl MemberRow {
    fn new(mut member: Member) -> Self {
        member.guild_ids.clear();
        Self {
            member,
            password_hash: None,
            session_token: None,
        }
    }
}

/// Kept in join order
#[derive(Debug, Clone, Copy)]
struct Membership {
    guild_id: GuildId,
    member_id: MemberId,
}

#[derive(Debug, Default)]
struct Ledger {
    records: Vec<DamageRecord>,
    reservations: Vec<Reservation>,
    sl_usages: Vec<SlUsage>,
}

/// Inverse of one applied mutation
#[derive(Debug)]
enum Undo {
    Nothing,
    PopRecord,
    RestoreRecord(usize, DamageRecord),
    PopReservation,
    RestoreReservation(usize, Reservation),
    PopSl,
    DropGuild(GuildId),
    DropMember(MemberId),
    PopMembership,
    RestoreMembership(usize, Membership),
    RestoreAdmins(GuildId, Vec<MemberId>),
}

fn in_scope(guild_id: GuildId, dataset: i32, scope: LedgerScope) -> bool {
    guild_id == scope.guild_id && dataset == scope.dataset
}

/// Mirrors the unique indexes of the reservations table
fn conflicts(existing: &Reservation, new: &Reservation) -> bool {
    if existing.guild_id != new.guild_id
        || existing.dataset != new.dataset
        || existing.member_id != new.member_id
    {
        return false;
    }
    let active = |kind: ReservationKind| matches!(kind, ReservationKind::Queue | ReservationKind::Tree);
    match (existing.kind, new.kind) {
        (ReservationKind::Subscribe, ReservationKind::Subscribe) => {
            existing.boss == new.boss && existing.cycle == new.cycle
        }
        (a, b) => active(a) && active(b),
    }
}

#[derive(Debug, Default)]
struct State {
    guilds: HashMap<GuildId, Guild>,
    members: HashMap<MemberId, MemberRow>,
    memberships: Vec<Membership>,
    ledger: Ledger,
}

impl State {
    fn apply(&mut self, scope: LedgerScope, mutation: LedgerMutation) -> RepoResult<Undo> {
        let undo = match mutation {
            LedgerMutation::InsertRecord(record) => {
                self.ledger.records.push(DamageRecord {
                    guild_id: scope.guild_id,
                    dataset: scope.dataset,
                    ..record
                });
                Undo::PopRecord
            }
            LedgerMutation::DeleteRecord(id) => {
                let index = self
                    .ledger
                    .records
                    .iter()
                    .position(|r| r.id == id && r.scope() == scope)
                    .ok_or(DomainError::RecordNotFound(id))?;
                Undo::RestoreRecord(index, self.ledger.records.remove(index))
            }
            LedgerMutation::InsertReservation(entry) => {
                let entry = Reservation {
                    guild_id: scope.guild_id,
                    dataset: scope.dataset,
                    ..entry
                };
                if self.ledger.reservations.iter().any(|r| conflicts(r, &entry)) {
                    return Err(DomainError::Conflict(format!(
                        "member {} already holds a conflicting {} entry",
                        entry.member_id, entry.kind
                    )));
                }
                self.ledger.reservations.push(entry);
                Undo::PopReservation
            }
            LedgerMutation::DeleteReservation(id) => {
                match self
                    .ledger
                    .reservations
                    .iter()
                    .position(|r| r.id == id && in_scope(r.guild_id, r.dataset, scope))
                {
                    Some(index) => {
                        Undo::RestoreReservation(index, self.ledger.reservations.remove(index))
                    }
                    None => Undo::Nothing,
                }
            }
            LedgerMutation::InsertSl(usage) => {
                self.ledger.sl_usages.push(SlUsage {
                    guild_id: scope.guild_id,
                    dataset: scope.dataset,
                    ..usage
                });
                Undo::PopSl
            }
            LedgerMutation::CreateGuild(guild) => {
                if self.guilds.contains_key(&scope.guild_id) {
                    return Err(DomainError::Conflict(format!(
                        "guild {} already exists",
                        scope.guild_id
                    )));
                }
                let mut stored = guild;
                stored.id = scope.guild_id;
                stored.members.clear();
                self.guilds.insert(scope.guild_id, stored);
                Undo::DropGuild(scope.guild_id)
            }
            LedgerMutation::RegisterMember(member) => {
                if self.members.contains_key(&member.id) {
                    Undo::Nothing
                } else {
                    let id = member.id;
                    self.members.insert(id, MemberRow::new(member));
                    Undo::DropMember(id)
                }
            }
            LedgerMutation::AddMembership(member_id) => {
                if !self.guilds.contains_key(&scope.guild_id) {
                    return Err(DomainError::GuildNotFound(scope.guild_id));
                }
                if !self.members.contains_key(&member_id) {
                    return Err(DomainError::MemberNotFound(member_id));
                }
                if self.membership_index(scope.guild_id, member_id).is_some() {
                    return Err(DomainError::Conflict(format!(
                        "member {member_id} already joined guild {}",
                        scope.guild_id
                    )));
                }
                self.memberships.push(Membership {
                    guild_id: scope.guild_id,
                    member_id,
                });
                Undo::PopMembership
            }
            LedgerMutation::RemoveMembership(member_id) => {
                let index = self
                    .membership_index(scope.guild_id, member_id)
                    .ok_or(DomainError::MemberNotFound(member_id))?;
                Undo::RestoreMembership(index, self.memberships.remove(index))
            }
            LedgerMutation::SetAdmins(admins) => {
                let guild = self
                    .guilds
                    .get_mut(&scope.guild_id)
                    .ok_or(DomainError::GuildNotFound(scope.guild_id))?;
                let previous = std::mem::replace(&mut guild.admins, admins);
                guild.updated_at = Utc::now();
                Undo::RestoreAdmins(scope.guild_id, previous)
            }
        };
        Ok(undo)
    }

    fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Nothing => {}
            Undo::PopRecord => {
                self.ledger.records.pop();
            }
            Undo::RestoreRecord(index, record) => self.ledger.records.insert(index, record),
            Undo::PopReservation => {
                self.ledger.reservations.pop();
            }
            Undo::RestoreReservation(index, entry) => self.ledger.reservations.insert(index, entry),
            Undo::PopSl => {
                self.ledger.sl_usages.pop();
            }
            Undo::DropGuild(id) => {
                self.guilds.remove(&id);
            }
            Undo::DropMember(id) => {
                self.members.remove(&id);
            }
            Undo::PopMembership => {
                self.memberships.pop();
            }
            Undo::RestoreMembership(index, membership) => {
                self.memberships.insert(index, membership);
            }
            Undo::RestoreAdmins(id, admins) => {
                if let Some(guild) = self.guilds.get_mut(&id) {
                    guild.admins = admins;
                }
            }
        }
    }

    fn membership_index(&self, guild_id: GuildId, member_id: MemberId) -> Option<usize> {
        self.memberships
            .iter()
            .position(|m| m.guild_id == guild_id && m.member_id == member_id)
    }

    fn guild_with_members(&self, guild: &Guild) -> Guild {
        let mut guild = guild.clone();
        guild.members = self
            .memberships
            .iter()
            .filter(|m| m.guild_id == guild.id)
            .map(|m| m.member_id)
            .collect();
        guild
    }

    fn member_with_guilds(&self, row: &MemberRow) -> Member {
        let mut member = row.member.clone();
        member.guild_ids = self
            .memberships
            .iter()
            .filter(|m| m.member_id == member.id)
            .map(|m| m.guild_id)
            .collect();
        member
    }
}

/// Shared in-memory store; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuildRepository for MemoryStore {
    async fn find_by_id(&self, id: GuildId) -> RepoResult<Option<Guild>> {
        let state = self.state.read();
        Ok(state.guilds.get(&id).map(|g| state.guild_with_members(g)))
    }

    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Guild>> {
        let state = self.state.read();
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.member_id == member_id)
            .filter_map(|m| state.guilds.get(&m.guild_id))
            .map(|g| state.guild_with_members(g))
            .collect())
    }

    async fn update(&self, guild: &Guild) -> RepoResult<()> {
        let mut state = self.state.write();
        let stored = state
            .guilds
            .get_mut(&guild.id)
            .ok_or(DomainError::GuildNotFound(guild.id))?;
        stored.name.clone_from(&guild.name);
        stored.region = guild.region;
        stored.admins.clone_from(&guild.admins);
        stored.active_dataset = guild.active_dataset;
        stored.updated_at = Utc::now();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: GuildId) -> RepoResult<()> {
        let mut state = self.state.write();
        if state.guilds.remove(&id).is_none() {
            return Err(DomainError::GuildNotFound(id));
        }
        state.memberships.retain(|m| m.guild_id != id);
        let ledger = &mut state.ledger;
        ledger.records.retain(|r| r.guild_id != id);
        ledger.reservations.retain(|r| r.guild_id != id);
        ledger.sl_usages.retain(|s| s.guild_id != id);
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let state = self.state.read();
        Ok(state.members.get(&id).map(|row| state.member_with_guilds(row)))
    }

    async fn find_by_guild(&self, guild_id: GuildId) -> RepoResult<Vec<Member>> {
        let state = self.state.read();
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.guild_id == guild_id)
            .filter_map(|m| state.members.get(&m.member_id))
            .map(|row| state.member_with_guilds(row))
            .collect())
    }

    async fn create(&self, member: &Member) -> RepoResult<()> {
        let mut state = self.state.write();
        if state.members.contains_key(&member.id) {
            return Err(DomainError::Conflict(format!(
                "member {} already exists",
                member.id
            )));
        }
        state.members.insert(member.id, MemberRow::new(member.clone()));
        Ok(())
    }

    async fn update(&self, member: &Member) -> RepoResult<()> {
        let mut state = self.state.write();
        let row = state
            .members
            .get_mut(&member.id)
            .ok_or(DomainError::MemberNotFound(member.id))?;
        row.member.name.clone_from(&member.name);
        row.member.updated_at = Utc::now();
        Ok(())
    }

    async fn get_password_hash(&self, id: MemberId) -> RepoResult<Option<String>> {
        let state = self.state.read();
        Ok(state
            .members
            .get(&id)
            .and_then(|row| row.password_hash.clone()))
    }

    async fn update_password(&self, id: MemberId, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.write();
        let row = state
            .members
            .get_mut(&id)
            .ok_or(DomainError::MemberNotFound(id))?;
        row.password_hash = Some(password_hash.to_string());
        row.session_token = None;
        Ok(())
    }

    async fn set_session_token(&self, id: MemberId, token: Option<&str>) -> RepoResult<()> {
        let mut state = self.state.write();
        if let Some(token) = token {
            if state
                .members
                .values()
                .any(|row| row.member.id != id && row.session_token.as_deref() == Some(token))
            {
                return Err(DomainError::Conflict("session token collision".to_string()));
            }
        }
        let row = state
            .members
            .get_mut(&id)
            .ok_or(DomainError::MemberNotFound(id))?;
        row.session_token = token.map(str::to_string);
        Ok(())
    }

    async fn find_by_session_token(&self, token: &str) -> RepoResult<Option<MemberId>> {
        let state = self.state.read();
        Ok(state
            .members
            .values()
            .find(|row| row.session_token.as_deref() == Some(token))
            .map(|row| row.member.id))
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn latest_per_boss(&self, scope: LedgerScope) -> RepoResult<Vec<DamageRecord>> {
        let state = self.state.read();
        let mut latest: HashMap<_, &DamageRecord> = HashMap::new();
        for record in state.ledger.records.iter().filter(|r| r.scope() == scope) {
            let newer = latest
                .get(&record.boss)
                .map_or(true, |cur| (record.recorded_at, record.id) > (cur.recorded_at, cur.id));
            if newer {
                latest.insert(record.boss, record);
            }
        }
        let mut records: Vec<DamageRecord> = latest.into_values().cloned().collect();
        records.sort_by_key(|r| r.boss);
        Ok(records)
    }

    async fn find_records(
        &self,
        scope: LedgerScope,
        query: &RecordQuery,
    ) -> RepoResult<Vec<DamageRecord>> {
        let state = self.state.read();
        let mut records: Vec<DamageRecord> = state
            .ledger
            .records
            .iter()
            .filter(|r| r.scope() == scope && query.matches(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.recorded_at, r.id));
        if query.newest_first {
            records.reverse();
        }
        if let Some(limit) = query.limit {
            records.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(records)
    }

    async fn find_reservations(
        &self,
        scope: LedgerScope,
        query: &ReservationQuery,
    ) -> RepoResult<Vec<Reservation>> {
        let state = self.state.read();
        let mut entries: Vec<Reservation> = state
            .ledger
            .reservations
            .iter()
            .filter(|r| in_scope(r.guild_id, r.dataset, scope) && query.matches(r))
            .cloned()
            .collect();
        entries.sort_by_key(|r| (r.created_at, r.id));
        Ok(entries)
    }

    async fn find_sl_usages(
        &self,
        scope: LedgerScope,
        query: &SlQuery,
    ) -> RepoResult<Vec<SlUsage>> {
        let state = self.state.read();
        let mut usages: Vec<SlUsage> = state
            .ledger
            .sl_usages
            .iter()
            .filter(|s| in_scope(s.guild_id, s.dataset, scope) && query.matches(s))
            .cloned()
            .collect();
        usages.sort_by_key(|s| (s.used_at, s.id));
        Ok(usages)
    }

    #[instrument(skip(self, plan), fields(mutations = plan.len()))]
    async fn apply(&self, scope: LedgerScope, plan: MutationPlan) -> RepoResult<()> {
        let mut state = self.state.write();
        let mut applied = Vec::with_capacity(plan.len());
        for mutation in plan.into_inner() {
            match state.apply(scope, mutation) {
                Ok(undo) => applied.push(undo),
                Err(e) => {
                    while let Some(undo) = applied.pop() {
                        state.undo(undo);
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, scope: LedgerScope) -> RepoResult<u64> {
        let mut state = self.state.write();
        let ledger = &mut state.ledger;
        let before = ledger.records.len() + ledger.reservations.len() + ledger.sl_usages.len();
        ledger.records.retain(|r| r.scope() != scope);
        ledger
            .reservations
            .retain(|r| !in_scope(r.guild_id, r.dataset, scope));
        ledger
            .sl_usages
            .retain(|s| !in_scope(s.guild_id, s.dataset, scope));
        let after = ledger.records.len() + ledger.reservations.len() + ledger.sl_usages.len();
        Ok((before - after) as u64)
    }
}
