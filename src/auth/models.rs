//! Authentication request/response models

use serde::{Deserialize, Serialize};

/// Login request: the one shared API key
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub api_key: String,
}

/// Login response: a signed token and when it stops working
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Expiry of the token, unix seconds
    pub expires_at: i64,
}
