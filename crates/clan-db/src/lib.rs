//! # clan-db
//!
//! Storage layer implementing the repository ports of `clan-core`.
//!
//! - PostgreSQL repositories over SQLx, with embedded migrations
//! - Row models and row ↔ entity mappers
//! - [`MemoryStore`], an in-process store used without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clan_db::{create_pool, run_migrations, PgLedgerRepository};
//!
//! async fn example(config: &clan_common::DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let ledger = PgLedgerRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool};
pub use repositories::{PgGuildRepository, PgLedgerRepository, PgMemberRepository};
