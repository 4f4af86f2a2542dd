//! Web login helpers

mod password;
mod session;

pub use password::{hash_password, validate_password_strength, verify_password};
pub use session::{generate_session_token, SESSION_TOKEN_LEN};
