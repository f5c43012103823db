//! Health check handler

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness only: answers ok regardless of model state. Readiness is
/// enforced at startup, where a failed load is fatal.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
