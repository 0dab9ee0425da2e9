/// Health check endpoint
///
/// Verifies the server is running and the database answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "active_connections": 1, "idle_connections": 4, "total_connections": 5 }
/// }
/// ```
///
/// A failed database ping yields `503` with `"status": "degraded"` so load
/// balancers can take the instance out of rotation.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use hirepath_shared::db::pool::{get_pool_stats, health_check as ping_database, PoolStats};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub pool: PoolStats,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let connected = match ping_database(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            false
        }
    };

    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if connected { "healthy" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database: if connected { "connected" } else { "disconnected" },
            pool: get_pool_stats(&state.db),
        }),
    )
}
