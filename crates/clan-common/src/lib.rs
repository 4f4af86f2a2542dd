//! # clan-common
//!
//! Shared utilities including configuration, boss tables, error handling,
//! web authentication helpers, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_session_token, hash_password, validate_password_strength, verify_password,
    SESSION_TOKEN_LEN,
};
pub use config::{
    load_boss_tables, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    Environment, LedgerConfig, RateLimitConfig, ServerConfig,
};
pub use error::AppError;
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
