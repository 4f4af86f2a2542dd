//! PostgreSQL repository implementations

mod error;
mod guild;
mod ledger;
mod member;

pub use error::{map_db_error, map_unique_violation};
pub use guild::PgGuildRepository;
pub use ledger::PgLedgerRepository;
pub use member::PgMemberRepository;
