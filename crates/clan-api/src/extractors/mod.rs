//! Axum extractors: session auth, guild membership, validated input, typed path ids

mod auth;
mod guild;
mod path;
mod validated;

pub use auth::AuthMember;
pub use guild::GuildMember;
pub use path::IdPath;
pub use validated::{ValidatedJson, ValidatedQuery};
