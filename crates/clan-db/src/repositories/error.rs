//! sqlx failures as domain errors

use clan_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Anything the store cannot explain in domain terms
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

fn is_unique_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Duplicate keys become `on_duplicate()`, everything else a storage error
pub fn map_unique_violation<F>(e: SqlxError, on_duplicate: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if is_unique_violation(&e) {
        on_duplicate()
    } else {
        map_db_error(e)
    }
}
