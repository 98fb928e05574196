//! Liveness endpoint for deployment probes.

use crate::Error;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up"),
    )
)]
pub async fn health_check() -> Result<impl IntoResponse, Error> {
    Ok((StatusCode::OK, Json(json!({"status": "ok"}))))
}
