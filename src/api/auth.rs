//! Shared-password authentication
//!
//! The catalog's admin surface is gated by one shared password checked
//! per request from the client; there are no sessions or tokens.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

/// POST /api/auth
pub async fn check_password(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let expected = state
        .config
        .admin_password
        .as_ref()
        .ok_or_else(|| ApiError::Config("RECIPEBOOK_ADMIN_PASSWORD is not set".to_string()))?;

    if request.password != *expected {
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(AuthResponse { success: true }))
}
