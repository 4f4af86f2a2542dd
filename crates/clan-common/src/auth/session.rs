//! Opaque session tokens for the web dashboard

use rand::distributions::Alphanumeric;
use rand::Rng;

pub const SESSION_TOKEN_LEN: usize = 40;

/// Random alphanumeric token, stored on the member until logout
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}
