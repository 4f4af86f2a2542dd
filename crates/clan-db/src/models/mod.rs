//! Database models - SQLx-compatible structs for PostgreSQL tables

mod guild;
mod ledger;
mod member;

pub use guild::GuildModel;
pub use ledger::{DamageRecordModel, ReservationModel, SlUsageModel};
pub use member::MemberModel;
