//! End-to-end helpers for the clan ledger API
//!
//! Servers run on the in-memory store by default, so the suite needs no
//! external services. Tests that want PostgreSQL check `DATABASE_URL` first.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
