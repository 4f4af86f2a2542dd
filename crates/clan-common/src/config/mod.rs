//! Configuration structs

mod app_config;
mod boss_tables;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, LedgerConfig,
    RateLimitConfig, ServerConfig,
};
pub use boss_tables::load_boss_tables;
