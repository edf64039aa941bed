//! Password hashing and verification (bcrypt)

use super::error::AuthError;

/// Default bcrypt cost factor.
pub const DEFAULT_COST: u32 = 12;

/// Bounds for the bcrypt cost factor.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash a plaintext password with bcrypt.
///
/// The cost defaults to [`DEFAULT_COST`] and is clamped to the algorithm's
/// safe range. Runs on the blocking thread pool so a slow hash never stalls
/// the async runtime.
pub async fn hash_password(plaintext: &str, cost: Option<u32>) -> Result<String, AuthError> {
    if plaintext.is_empty() {
        return Err(AuthError::Validation("password must not be empty".into()));
    }
    let plaintext = plaintext.to_string();
    let cost = cost.unwrap_or(DEFAULT_COST).clamp(MIN_COST, MAX_COST);

    tokio::task::spawn_blocking(move || {
        bcrypt::hash(plaintext, cost).map_err(|e| AuthError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch; an error only for unusable inputs or a
/// hashing failure. Runs on the blocking thread pool.
pub async fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool, AuthError> {
    if plaintext.is_empty() || stored_hash.is_empty() {
        return Err(AuthError::Validation(
            "password and stored hash must not be empty".into(),
        ));
    }
    let plaintext = plaintext.to_string();
    let stored_hash = stored_hash.to_string();

    tokio::task::spawn_blocking(move || {
        bcrypt::verify(plaintext, &stored_hash).map_err(|e| AuthError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))?
}
