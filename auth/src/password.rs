use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid or verification failed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        let argon2 = Argon2::default();

        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
