//! Health check endpoint

use axum::Json;
use serde::Serialize;

use crate::build_info::BuildInfo;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub build_number: u64,
    pub timestamp: String,
}

/// GET /health
///
/// No authentication; used for monitoring.
pub async fn health_check() -> Json<HealthResponse> {
    let info = BuildInfo::current();
    Json(HealthResponse {
        status: "ok".to_string(),
        service: info.name.to_string(),
        version: info.version.to_string(),
        build_number: info.build_number,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
