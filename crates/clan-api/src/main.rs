//! Clan ledger API server
//!
//! Run with:
//! ```bash
//! cargo run -p clan-api
//! ```
//!
//! Configuration comes from environment variables (and `.env`). Without
//! `DATABASE_URL` the server keeps everything in memory.

use clan_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting clan ledger API...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        persistent = config.database.is_some(),
        "Configuration loaded"
    );

    clan_api::run(config).await?;

    Ok(())
}
