use axum::response::Json;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    // The upstream token is per request, so there is nothing to probe here
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
