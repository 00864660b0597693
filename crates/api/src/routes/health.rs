//! Liveness and readiness endpoints.
//!
//! `/health` answers as long as the process is up; `/health/ready` also
//! pings the database, so load balancers can hold traffic during startup.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tracing::error;

use crate::AppState;

/// Liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: &'static str,
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

fn healthy() -> HealthResponse {
    HealthResponse {
        service: "miosaas",
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// Liveness handler.
async fn health_check() -> Json<HealthResponse> {
    Json(healthy())
}

/// Readiness handler: verifies the database answers.
async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(healthy())).into_response(),
        Err(e) => {
            error!(error = %e, "Readiness check failed: database unreachable");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(ready_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_payload_names_the_service() {
        let body = serde_json::to_value(healthy()).unwrap();

        assert_eq!(body["service"], "miosaas");
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
