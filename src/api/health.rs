//! Root banner, liveness and readiness endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::api::types::Json;

const STORE_UNAVAILABLE: &str = "user store unavailable";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
}

/// Readiness body: overall status plus the user store probe
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub user_store: StoreCheck,
}

/// Outcome of a round trip to the user store. Failures carry a fixed
/// message; the underlying error only goes to the log.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCheck {
    pub status: HealthStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Root banner used by uptime checks
pub async fn root() -> &'static str {
    "Server is running"
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the user store answers a count
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let user_store = check_user_store(&state).await;
    let status = user_store.status;

    let response = ReadinessResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        user_store,
    };

    (status.status_code(), Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_user_store(state: &AppState) -> StoreCheck {
    let start = Instant::now();
    let result = state.user_service.count().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => StoreCheck {
            status: HealthStatus::Healthy,
            latency_ms,
            message: None,
        },
        Err(e) => {
            warn!(error = %e, latency_ms, "Readiness check failed");
            StoreCheck {
                status: HealthStatus::Unhealthy,
                latency_ms,
                message: Some(STORE_UNAVAILABLE),
            }
        }
    }
}
