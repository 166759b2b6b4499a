//! JWT issuance and validation
//!
//! Tokens carry only an issuance and an expiry timestamp; they assert that
//! the caller presented a valid API key at `iat`. Expiry is checked against
//! a caller-supplied clock value with zero leeway, so the validity window is
//! exact and testable.

use crate::core::error::{AuthError, KeygateError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuance time, unix seconds
    pub iat: i64,
    /// Expiry time, unix seconds
    pub exp: i64,
}

/// A freshly signed token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Sign a token valid for `ttl_minutes` starting at `now`.
///
/// The HS256 signature covers the full claim set, so altering either
/// timestamp invalidates the token.
pub fn issue_token(now: DateTime<Utc>, secret: &str, ttl_minutes: u64) -> Result<IssuedToken> {
    let expires_at = now
        .checked_add_signed(chrono::Duration::minutes(ttl_minutes as i64))
        .ok_or_else(|| KeygateError::Internal("Token expiry overflows".to_string()))?;

    let claims = Claims {
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| KeygateError::Internal(format!("Failed to sign token: {}", e)))?;

    Ok(IssuedToken {
        token,
        expires_at: claims.exp,
    })
}

/// Validate a presented token and extract its claims.
///
/// Checks, all mandatory: the token decodes structurally, the signature
/// verifies against `secret`, and `now` is strictly before the expiry. A
/// token issued at `t` with TTL `m` minutes is valid on `[t, t + m*60)` and
/// expired at exactly `t + m*60`. Any failure rejects the token entirely.
pub fn verify_token(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> std::result::Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the caller's clock, with zero leeway
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    if now.timestamp() >= data.claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(data.claims)
}
