//! Credential hashing.
//!
//! New passwords are hashed with Argon2id into PHC strings. Verification also
//! accepts bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) written by earlier deployments.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use std::sync::OnceLock;

use super::AuthError;

/// Minimum password length, counted in characters rather than bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Rejects passwords that fail the strength policy.
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    validate_password_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks a login attempt against a stored hash.
///
/// Never fails: a mismatch and an unreadable hash both yield `false`.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    if is_bcrypt_hash(hashed_password) {
        return match bcrypt::verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("Stored bcrypt hash could not be verified: {}", e);
                false
            }
        };
    }

    match PasswordHash::new(hashed_password) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}

/// Runs one full Argon2 verification against a throwaway hash and discards the
/// result. Login calls this when no account matches the email, so an unknown email
/// costs as much as a wrong password.
pub fn verify_against_placeholder(password: &str) {
    let _ = verify_password(password, placeholder_hash());
}

fn placeholder_hash() -> &'static str {
    static PLACEHOLDER: OnceLock<String> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(b"placeholder-credential", &salt)
            .map(|hash| hash.to_string())
            .unwrap_or_else(|e| {
                log::error!("Failed to build placeholder password hash: {}", e);
                String::new()
            })
    })
}

fn is_bcrypt_hash(hashed_password: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| hashed_password.starts_with(prefix))
}
