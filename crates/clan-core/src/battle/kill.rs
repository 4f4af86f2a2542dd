//! Kill resolution - who must stop, whose tree falls, who may go next
//!
//! Runs before the kill is persisted, against the board as it was before the
//! hit. Produces the reservations to delete and three disjoint recipient lists.

use std::collections::BTreeSet;

use crate::entities::{Reservation, ReservationKind};
use crate::value_objects::{BossIndex, BossLayout, BossTableError, MemberId, RecordId};

use super::boss_state::BossBoard;

/// Recipients of the notices sent after a boss falls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillNotice {
    pub boss: BossIndex,
    /// Cycle the boss was killed at
    pub cycle: i32,
    /// Queued on the boss or subscribed to the killed cycle
    pub stop: Vec<MemberId>,
    /// Their tree on the boss was cleared
    pub tree_cleared: Vec<MemberId>,
    /// Subscribed to a boss/cycle that just opened
    pub now_go: Vec<MemberId>,
}

/// Outcome of resolving a kill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillResolution {
    /// Reservations made stale by the kill
    pub stale: Vec<RecordId>,
    pub notice: KillNotice,
}

/// Resolve the kill of `killed` on `before`
///
/// `reservations` are the live reservations of the guild that survive the
/// reporter's own clean-up; `excluded` members (reporter and proxy) are never
/// notified.
pub fn resolve_kill(
    before: &BossBoard<'_>,
    killed: BossIndex,
    reservations: &[Reservation],
    excluded: &[MemberId],
) -> Result<KillResolution, BossTableError> {
    let killed_cycle = before.status(killed).cycle;
    let after = before.with_kill(killed)?;
    let previous_max = before.max_challengeable_cycle();
    let current_max = after.max_challengeable_cycle();

    let mut stale = Vec::new();
    let mut stop = Vec::new();
    let mut tree_cleared = Vec::new();

    for entry in reservations.iter().filter(|r| r.boss == killed) {
        match entry.kind {
            ReservationKind::Tree => {
                stale.push(entry.id);
                tree_cleared.push(entry.member_id);
            }
            ReservationKind::Queue => {
                stale.push(entry.id);
                stop.push(entry.member_id);
            }
            ReservationKind::Subscribe if entry.cycle == killed_cycle => {
                stale.push(entry.id);
                stop.push(entry.member_id);
            }
            ReservationKind::Subscribe => {}
        }
    }

    let opened: Vec<(BossIndex, i32)> = match after.layout() {
        BossLayout::MultiBoss => BossIndex::all()
            .filter(|&boss| {
                let cycle = after.status(boss).cycle;
                if boss == killed {
                    after.is_challengeable(boss, cycle)
                } else {
                    current_max >= previous_max && cycle == current_max
                }
            })
            .map(|boss| (boss, after.status(boss).cycle))
            .collect(),
        BossLayout::SingleRotatingBoss => after
            .active_bosses()
            .into_iter()
            .map(|boss| (boss, after.status(boss).cycle))
            .collect(),
    };

    let now_go: Vec<MemberId> = reservations
        .iter()
        .filter(|r| r.kind == ReservationKind::Subscribe)
        .filter(|r| opened.contains(&(r.boss, r.cycle)))
        .map(|r| r.member_id)
        .collect();

    // now-go > tree-cleared > stop
    let mut seen: BTreeSet<MemberId> = excluded.iter().copied().collect();
    let now_go = take_unseen(now_go, &mut seen);
    let tree_cleared = take_unseen(tree_cleared, &mut seen);
    let stop = take_unseen(stop, &mut seen);

    Ok(KillResolution {
        stale,
        notice: KillNotice {
            boss: killed,
            cycle: killed_cycle,
            stop,
            tree_cleared,
            now_go,
        },
    })
}

fn take_unseen(members: Vec<MemberId>, seen: &mut BTreeSet<MemberId>) -> Vec<MemberId> {
    members.into_iter().filter(|m| seen.insert(*m)).collect()
}
