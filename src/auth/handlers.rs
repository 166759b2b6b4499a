//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::jwt::issue_token;
use crate::auth::models::{LoginRequest, LoginResponse};
use crate::auth::password::verify_credential;
use crate::core::error::{AuthError, KeygateError, Result};
use axum::{extract::State, Json};
use chrono::Utc;

/// Handler for POST /login - Exchange the API key for a signed token
///
/// Only registered in token mode. The bcrypt check runs on the blocking
/// pool so concurrent logins do not serialize behind one another.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = state.auth.clone();
    let presented = req.api_key;

    let valid = tokio::task::spawn_blocking(move || {
        verify_credential(&presented, &auth.api_key_hash)
    })
    .await
    .map_err(|e| KeygateError::Internal(format!("Verification task failed: {}", e)))?;

    if !valid {
        tracing::warn!("Login attempt with invalid API key");
        return Err(AuthError::InvalidCredential.into());
    }

    let issued = issue_token(Utc::now(), &state.auth.jwt_secret, state.auth.token_ttl_minutes)?;

    tracing::info!(expires_at = issued.expires_at, "API key exchanged for token");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
