//! # Password hashing and verification — Argon2id
//!
//! Registrants choose a password when they join the waitlist. It is never
//! stored as given: [`hash_password`] generates a random salt via [`OsRng`],
//! hashes with the default Argon2id parameters, and returns a PHC-format
//! string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`) that is persisted under
//! the `passwordHash` document key.
//!
//! [`verify_password`] parses a PHC-format hash and checks a candidate
//! plaintext against it. Returns `Ok(true)` on match, `Ok(false)` on mismatch,
//! or `Err` if the stored hash is malformed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
