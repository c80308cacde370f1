//! Liveness endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::routes::ApiState;
use crate::storage::check_connection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Reports `ok` when the database answers, `degraded` with a 503 otherwise.
pub async fn health_handler(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match check_connection(&state.pool).await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            warn!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    let body = HealthResponse { status: label.to_string(), version: crate::VERSION.to_string() };
    (status, Json(body))
}
