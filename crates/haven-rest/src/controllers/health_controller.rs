//! Health check controller.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use futures::future::join_all;
use haven_core::HealthStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness report.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// `healthy`, `degraded` or `unhealthy`
    pub status: String,
    /// Status per dependency.
    pub checks: BTreeMap<String, DependencyStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DependencyStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Probes every registered dependency.
///
/// Only an unhealthy dependency fails the probe; a degraded cache store is
/// reported but the service stays ready.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "A required dependency is down", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let results = join_all(state.health_checks.iter().map(|check| async move {
        (check.name().to_string(), check.check().await)
    }))
    .await;

    let unhealthy = results.iter().any(|(_, status)| status.is_unhealthy());
    let degraded = results.iter().any(|(_, status)| !status.is_healthy());
    let checks = results
        .into_iter()
        .map(|(name, status)| {
            let detail = match &status {
                HealthStatus::Healthy => None,
                HealthStatus::Degraded(reason)
                | HealthStatus::Unhealthy(reason) => Some(reason.clone()),
            };
            (
                name,
                DependencyStatus {
                    status: status.label().to_string(),
                    detail,
                },
            )
        })
        .collect();

    let (code, status) = if unhealthy {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if degraded {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "healthy")
    };

    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            checks,
        }),
    )
}

#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
