//! Ledger mutations - the write half of every command
//!
//! Commands validate first and then hand the whole list to
//! `LedgerRepository::apply`, which applies it all or nothing. Roster changes
//! (guild creation, memberships, admins) travel in the same plan so a
//! command never leaves a guild half updated.

use crate::entities::{DamageRecord, Guild, Member, Reservation, SlUsage};
use crate::value_objects::{MemberId, RecordId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerMutation {
    InsertRecord(DamageRecord),
    DeleteRecord(RecordId),
    InsertReservation(Reservation),
    DeleteReservation(RecordId),
    InsertSl(SlUsage),
    /// The scope's guild; fails if it exists
    CreateGuild(Guild),
    /// Member identity; an existing one is kept untouched
    RegisterMember(Member),
    /// Join the scope's guild; fails if already joined
    AddMembership(MemberId),
    /// Leave the scope's guild; fails if not joined
    RemoveMembership(MemberId),
    /// Replace the scope's guild admin set
    SetAdmins(Vec<MemberId>),
}

/// Ordered list of mutations; reservation deletes are de-duplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationPlan {
    mutations: Vec<LedgerMutation>,
}

impl MutationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: LedgerMutation) {
        if let LedgerMutation::DeleteReservation(id) = &mutation {
            if self.deletes_reservation(*id) {
                return;
            }
        }
        self.mutations.push(mutation);
    }

    pub fn delete_reservations<I: IntoIterator<Item = RecordId>>(&mut self, ids: I) {
        for id in ids {
            self.push(LedgerMutation::DeleteReservation(id));
        }
    }

    pub fn deletes_reservation(&self, id: RecordId) -> bool {
        self.mutations
            .iter()
            .any(|m| matches!(m, LedgerMutation::DeleteReservation(d) if *d == id))
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn mutations(&self) -> &[LedgerMutation] {
        &self.mutations
    }

    pub fn into_inner(self) -> Vec<LedgerMutation> {
        self.mutations
    }
}
