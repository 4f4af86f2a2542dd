//! Request handlers, one module per resource

pub mod auth;
pub mod battle;
pub mod guilds;
pub mod health;
pub mod members;
pub mod queries;
pub mod status;
