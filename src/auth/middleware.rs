//! Authentication middleware

use crate::auth::jwt::verify_token;
use crate::auth::password::verify_credential;
use crate::auth::AuthState;
use crate::core::config::AuthMode;
use crate::core::error::{AuthError, KeygateError, Result};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// HTTP header carrying the raw API key in api-key mode
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Marker attached to requests that passed authentication.
///
/// Handlers can take this as an extractor to assert they are only reachable
/// through the gate.
#[derive(Clone, Debug)]
pub struct AuthPrincipal {
    /// Expiry of the presented token, unix seconds; None in api-key mode
    pub expires_at: Option<i64>,
}

/// Authentication middleware gating every protected route.
///
/// Depending on the configured mode the caller presents either the raw API
/// key or a previously issued token. A missing credential is rejected the
/// same way as an invalid one; the concrete reason exists only in the logs.
pub async fn authenticate(
    State(auth): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match auth.mode {
        AuthMode::Token => check_token(&auth, &request),
        AuthMode::ApiKey => {
            // Read the credential into an owned value up front so no reference
            // to the (non-Sync) request is held across the await below; that
            // is what keeps the middleware future Send.
            let presented = request
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);
            check_api_key(&auth, presented).await
        }
    };

    match outcome {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(kind) => KeygateError::from(kind).into_response(),
    }
}

/// Token mode: validate the JWT from the Authorization header.
fn check_token(auth: &AuthState, request: &Request) -> std::result::Result<AuthPrincipal, AuthError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Malformed)?;

    // "Bearer <token>" or the bare token
    let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

    let claims = verify_token(token, &auth.jwt_secret, chrono::Utc::now())?;

    Ok(AuthPrincipal {
        expires_at: Some(claims.exp),
    })
}

/// Api-key mode: bcrypt-verify the presented key against the stored hash.
///
/// bcrypt is CPU-bound and intentionally slow, so the verification runs on
/// the blocking pool; concurrent requests do not stall the async executor.
async fn check_api_key(
    auth: &AuthState,
    presented: Option<String>,
) -> std::result::Result<AuthPrincipal, AuthError> {
    let presented = presented.ok_or(AuthError::Malformed)?;

    let stored_hash = auth.api_key_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_credential(&presented, &stored_hash))
        .await
        // A failed join counts as a failed match
        .unwrap_or(false);

    if valid {
        Ok(AuthPrincipal { expires_at: None })
    } else {
        Err(AuthError::InvalidCredential)
    }
}

// Allow handlers to extract the principal attached by the middleware
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = KeygateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts.extensions.get::<AuthPrincipal>().cloned().ok_or_else(|| {
            KeygateError::Internal("request reached a handler without passing the gate".to_string())
        })
    }
}
