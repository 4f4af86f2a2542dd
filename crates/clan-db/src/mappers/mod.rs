//! Model to entity mappers
//!
//! Rows are converted with `TryFrom`: a stored value outside the domain's
//! range (unknown region, boss 0) surfaces as a database error.

mod guild;
mod ledger;
mod member;

use clan_core::{BossIndex, DomainError, MemberId};

fn boss_from_row(value: i16) -> Result<BossIndex, DomainError> {
    BossIndex::new(i32::from(value))
        .map_err(|e| DomainError::DatabaseError(format!("corrupt row: {e}")))
}

pub(crate) fn boss_to_row(boss: BossIndex) -> i16 {
    boss.get() as i16
}

/// `BIGINT[]` form of an id list (guild admins)
pub(crate) fn member_ids_to_row(ids: &[MemberId]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}
