//! Password hashing and verification.
//!
//! Passwords are stored only as Argon2id hashes with a random
//! per-password salt. The plaintext is never logged or persisted.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Error produced by hashing or verifying a password.
#[derive(Debug)]
pub enum PasswordError {
    /// Hashing failed (surfaces as a 500, never swallowed)
    HashingFailed,
    /// The stored hash could not be parsed
    MalformedHash,
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::HashingFailed => write!(f, "Failed to hash password"),
            PasswordError::MalformedHash => write!(f, "Malformed password hash"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against a stored hash.
///
/// Comparison is constant-time inside the argon2 crate.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::MalformedHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
