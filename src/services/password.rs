//! Password hashing module
//!
//! Secure password hashing and verification using Argon2id with a random
//! salt per hash.
//!
//! # Truncation
//!
//! Inputs are truncated to their first 72 bytes before hashing and before
//! verification. Argon2 itself has no such limit; the rule is kept from the
//! system's bcrypt-era credential format so that re-hashed credentials keep
//! the same equality semantics: two passwords that differ only beyond byte
//! 72 verify against each other's hashes.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Maximum number of password bytes fed to the hash function.
const PASSWORD_MAX_BYTES: usize = 72;

fn truncate(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(PASSWORD_MAX_BYTES)]
}

/// Hash a password using Argon2id with secure defaults.
///
/// Returns the hash in PHC string format (algorithm, parameters, salt, and
/// hash). Only the first 72 bytes of the password participate.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(truncate(password), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Applies the same 72-byte truncation as [`hash_password`]. Returns `false`
/// for a mismatch and an error only when the stored hash itself is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    let argon2 = Argon2::default();

    match argon2.verify_password(truncate(password), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e))
            .context("Password verification error"),
    }
}
