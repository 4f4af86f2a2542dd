//! Liveness and readiness checks

use axum::{extract::State, http::StatusCode, Json};
use clan_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
///
/// The in-memory ledger is always ready; PostgreSQL must hand out a connection.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let response = match state.pool() {
        Some(pool) => ReadinessResponse::new("postgres", pool.acquire().await.is_ok()),
        None => ReadinessResponse::new("memory", true),
    };

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
