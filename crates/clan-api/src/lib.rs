//! # clan-api
//!
//! HTTP front-end of the clan battle ledger, built on Axum. Members log in
//! with the password they set from chat and drive the same commands the chat
//! front-end does.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
