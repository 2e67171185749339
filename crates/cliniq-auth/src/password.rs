//! Password hashing
//!
//! Argon2id hashing with per-password random salts. Plaintext passwords are
//! never stored or logged.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

use crate::config::PasswordConfig;
use crate::error::{AuthError, AuthResult};

/// Password hashing and verification service
#[derive(Clone)]
pub struct PasswordService {
    min_length: usize,
    max_length: usize,
}

impl PasswordService {
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            min_length: config.min_password_length,
            max_length: config.max_password_length,
        }
    }

    /// Check a candidate password against the length policy
    pub fn validate(&self, password: &str) -> AuthResult<()> {
        if password.len() < self.min_length {
            return Err(AuthError::WeakPassword(format!(
                "must be at least {} characters",
                self.min_length
            )));
        }
        if password.len() > self.max_length {
            return Err(AuthError::WeakPassword(format!(
                "must be at most {} characters",
                self.max_length
            )));
        }
        Ok(())
    }

    /// Validate and hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        self.validate(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHashingFailed)?;

        Ok(hash.to_string())
    }

    /// Verify a candidate password against a stored hash. Any mismatch or
    /// malformed hash reads as invalid credentials.
    pub fn verify(&self, password: &str, stored_hash: &str) -> AuthResult<()> {
        let parsed = PasswordHash::new(stored_hash)?;
        Argon2::default().verify_password(password.as_bytes(), &parsed)?;
        Ok(())
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(&PasswordConfig::default())
    }
}
