//! Application assembly and the HTTP listener

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clan_common::{load_boss_tables, AppConfig, AppError};
use clan_core::{RecordIdGenerator, SystemClock};
use clan_db::{
    create_pool, run_migrations, MemoryStore, PgGuildRepository, PgLedgerRepository,
    PgMemberRepository,
};
use clan_service::{ServiceContextBuilder, TracingNotifier};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete router: rate-limited API plus unthrottled health checks
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Wire repositories, boss tables and the notifier into an `AppState`
///
/// With a database configured the ledger lives in PostgreSQL and pending
/// migrations run first; otherwise it is kept in memory.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let tables = load_boss_tables(&config.ledger.boss_tables_path)
        .map_err(|e| AppError::Config(e.to_string()))?;
    info!(path = %config.ledger.boss_tables_path, "Boss tables loaded");

    let builder = ServiceContextBuilder::new()
        .boss_tables(Arc::new(tables))
        .clock(Arc::new(SystemClock))
        .id_generator(Arc::new(RecordIdGenerator::new(config.ledger.id_worker)))
        .notifier(Arc::new(TracingNotifier));

    let (builder, pool) = match &config.database {
        Some(db_config) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established, migrations applied");

            let builder = builder
                .guild_repo(Arc::new(PgGuildRepository::new(pool.clone())))
                .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
                .ledger(Arc::new(PgLedgerRepository::new(pool.clone())));
            (builder, Some(pool))
        }
        None => {
            warn!("No database configured, the ledger is kept in memory");
            (builder.memory_store(MemoryStore::new()), None)
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Serve `app` on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{addr}");
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Bind the configured address and serve
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {addr}");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config.api.address().parse().map_err(|e| {
        AppError::Config(format!("Invalid listen address {}: {e}", config.api.address()))
    })?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
