//! Password hashing and verification using Argon2
//!
//! Stores argon2id PHC strings; the raw password never reaches the
//! database.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::db::DbError;

/// Hashing failed, or a stored hash could not be parsed
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CredentialError(String);

impl From<CredentialError> for DbError {
    fn from(e: CredentialError) -> Self {
        DbError::Credential(e.0)
    }
}

/// Capability used by the authorization store and the sign-up path
pub trait CredentialHasher: Send + Sync {
    /// Hash a raw password into an opaque credential string.
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Check a raw password against a stored credential.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Argon2id with default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError(format!("failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| CredentialError(format!("invalid password hash format: {e}")))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("correct-horse-battery-staple", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_hash_format() {
        let err = Argon2Hasher.verify("password", "not-a-valid-hash").unwrap_err();
        assert!(matches!(DbError::from(err), DbError::Credential(_)));
    }
}
