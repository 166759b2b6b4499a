//! Authentication module
//!
//! This module provides the authentication core of the gateway:
//! - API key verification against the stored bcrypt hash
//! - JWT issuance and validation
//! - The middleware gating every protected request
//! - The login handler exchanging a key for a token

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{issue_token, verify_token, Claims, IssuedToken};
pub use middleware::{authenticate, AuthPrincipal, API_KEY_HEADER};
pub use password::{hash_credential, verify_credential};

use crate::core::config::{AuthConfig, AuthMode};

/// Process-wide authentication state.
///
/// Constructed once at startup from the validated configuration and never
/// mutated afterwards, so it is shared across concurrent handlers behind a
/// plain `Arc` without locking. Changing the signing secret would invalidate
/// every outstanding token, which is exactly why it cannot change within a
/// process lifetime.
#[derive(Debug)]
pub struct AuthState {
    pub mode: AuthMode,
    /// bcrypt hash of the one valid API key
    pub api_key_hash: String,
    /// Symmetric signing secret for tokens (token mode)
    pub jwt_secret: String,
    /// Token lifetime (token mode)
    pub token_ttl_minutes: u64,
}

impl AuthState {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            mode: config.mode,
            api_key_hash: config.api_key_hash.clone(),
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_minutes: config.token_ttl_minutes,
        }
    }
}
