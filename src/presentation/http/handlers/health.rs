//! Health Check Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::startup::AppState;

/// Basic health check
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "petcare-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: verifies the database answers
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "database": "up" }))),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "database": "down" })),
            )
        }
    }
}
