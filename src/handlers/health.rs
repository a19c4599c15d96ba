use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
    /// Stored wins; absent when the database could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub database: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the wins table answers a count.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    match state.store.count().await {
        Ok(entries) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                checks: ReadinessChecks { database: "ok" },
                entries: Some(entries),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready",
                    checks: ReadinessChecks { database: "failed" },
                    entries: None,
                }),
            )
        }
    }
}
