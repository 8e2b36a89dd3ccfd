use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt work factor for stored password hashes.
pub const HASH_COST: u32 = 10;

/// Hashes `password` into a self-describing bcrypt string (algorithm, cost and salt embedded).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Compares `password` against a stored hash. A mismatch is `Ok(false)`; only a
/// malformed hash is an error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
