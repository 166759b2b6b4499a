//! API key hashing and verification using bcrypt

use crate::core::error::{KeygateError, Result};

/// Hash a plaintext API key using bcrypt.
///
/// Used by the `--hash-key` CLI path to produce the value operators put in
/// the configuration; the server itself only ever verifies.
pub fn hash_credential(key: &str) -> Result<String> {
    bcrypt::hash(key, bcrypt::DEFAULT_COST)
        .map_err(|e| KeygateError::Internal(format!("Failed to hash credential: {}", e)))
}

/// Verify a plaintext API key against the stored bcrypt hash.
///
/// bcrypt performs the comparison internally in constant time relative to
/// the hash contents; no string comparison happens here. Any bcrypt error
/// (malformed hash, bad encoding) counts as a failed match, never a match
/// and never a propagated error.
pub fn verify_credential(key: &str, stored_hash: &str) -> bool {
    bcrypt::verify(key, stored_hash).unwrap_or(false)
}
