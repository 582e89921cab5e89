//! Password hashing with bcrypt.
//!
//! The reference host stores bcrypt hashes for its accounts; the operator CLI uses
//! [`hash_password`] to produce them for fixtures.

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcrypt::verify;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with_cost("correctpassword", 4).unwrap();
        assert_ne!(hash, "correctpassword");
        assert!(verify("correctpassword", &hash).unwrap());
        assert!(!verify("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_invalid_cost_is_internal_error() {
        let err = hash_password_with_cost("secret", 99).unwrap_err();
        assert!(err.is_server_error());
    }
}
