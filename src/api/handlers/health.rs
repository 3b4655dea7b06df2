//! Health check endpoint handlers.
//!
//! The readiness and full health checks round-trip to the configured student
//! store; liveness only proves the process answers.

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus, MessageResponse};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use std::collections::HashMap;
use std::time::Instant;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const ROOT_MESSAGE: &str = "School Management System API is running";

/// Creates health check routes.
///
/// # Routes
/// - `GET /` - Plain status message
/// - `GET /api/health` - Health check with storage status
/// - `GET /api/health/ready` - Readiness probe
/// - `GET /api/health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(root))
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Plain status message.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API is running", body = MessageResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// Health check with storage connectivity.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = check_storage(&state).await;
    let status = storage.status;

    let mut checks = HashMap::new();
    checks.insert("storage".to_string(), storage);

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    };

    let code = match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(response))
}

/// Readiness probe endpoint.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_storage(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe endpoint.
#[utoipa::path(
    get,
    path = "/api/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_storage(state: &AppState) -> ComponentHealth {
    let start_time = Instant::now();
    let students = &state.services.students;

    match students.check_storage().await {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some(format!("{} backend reachable", students.backend())),
            response_time_ms: Some(start_time.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, backend = students.backend(), "Storage health check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                response_time_ms: Some(start_time.elapsed().as_millis() as u64),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::Repositories;

    fn memory_state() -> AppState {
        AppState::new(Repositories::in_memory())
    }

    #[tokio::test]
    async fn test_liveness_check() {
        assert_eq!(liveness_check().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_message() {
        let Json(body) = root().await;
        assert_eq!(body.message, ROOT_MESSAGE);
    }

    #[tokio::test]
    async fn test_health_check_on_memory_backend() {
        let (code, Json(response)) = health_check(State(memory_state())).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(response.status, HealthStatus::Healthy);
        let storage = &response.checks["storage"];
        assert_eq!(storage.message.as_deref(), Some("memory backend reachable"));
    }

    #[tokio::test]
    async fn test_readiness_on_memory_backend() {
        assert_eq!(readiness_check(State(memory_state())).await, StatusCode::OK);
    }
}
