//! Health check
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /health | GET | liveness plus a database round trip |

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::DbService;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    environment: String,
    database: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: Option<u64>,
    message: Option<String>,
}

pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    let start = std::time::Instant::now();
    let database = match DbService::ping(&state.pool).await {
        Ok(()) => CheckResult {
            status: "ok",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            CheckResult {
                status: "error",
                latency_ms: None,
                message: Some("database unavailable".into()),
            }
        }
    };

    let healthy = database.status == "ok";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.clone(),
            database,
        }),
    )
}
