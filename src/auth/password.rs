//! Password hashing and verification using Argon2id

use crate::{config::AppConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable parameters
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    min_length: usize,
}

impl PasswordHasher {
    /// Create hasher with an explicit work factor
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 params: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            min_length: 6,
        })
    }

    /// Create hasher from the security section of the config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let security = &config.security;
        let mut hasher = Self::new(
            security.password_hash_memory_kib,
            security.password_hash_iterations,
            security.password_hash_parallelism,
        )?;
        hasher.min_length = security.password_min_length;
        Ok(hasher)
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a hash.
    ///
    /// A wrong password is `Ok(false)`; a digest that cannot be parsed or
    /// checked is an internal error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::error!("Failed to parse password hash: {:?}", e);
            AppError::Internal(format!("Failed to parse password hash: {}", e))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::error!("Failed to verify password: {:?}", e);
                Err(AppError::Internal(format!("Failed to verify password: {}", e)))
            }
        }
    }

    /// Hash on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }

    /// Validate password against policy
    pub fn validate_password_policy(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small work factor keeps the unit tests fast
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(8 * 1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("TestPassword123!").unwrap();
        assert!(hasher.verify("TestPassword123!", &hash).unwrap());
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = hasher();
        let hash = hasher.hash("TestPassword123!").unwrap();
        assert!(!hasher.verify("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = hasher();
        let hash1 = hasher.hash("TestPassword123!").unwrap();
        let hash2 = hasher.hash("TestPassword123!").unwrap();

        // Hashes should be different due to salt
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("TestPassword123!", &hash1).unwrap());
        assert!(hasher.verify("TestPassword123!", &hash2).unwrap());
    }

    #[test]
    fn test_corrupt_digest_is_an_error_not_a_mismatch() {
        let hasher = hasher();
        assert!(matches!(
            hasher.verify("whatever", "not-a-phc-string"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(PasswordHasher::new(1, 1, 1).is_err());
    }

    #[test]
    fn test_password_policy_validation() {
        let hasher = hasher();
        assert!(hasher.validate_password_policy("secret1").is_ok());
        assert!(hasher.validate_password_policy("short").is_err());
    }

    #[tokio::test]
    async fn test_blocking_roundtrip() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("OffThread1".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking("OffThread1".to_string(), hash)
            .await
            .unwrap());
    }
}
