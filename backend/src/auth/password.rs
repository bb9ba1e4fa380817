//! Password hashing using bcrypt
//!
//! Provides secure password hashing and verification.
//!
//! bcrypt only reads the first 72 bytes of the input, so longer passwords
//! are truncated explicitly before hashing and verification to keep the two
//! paths consistent.

use anyhow::Result;
use bcrypt::DEFAULT_COST;

/// bcrypt input limit in bytes
const BCRYPT_MAX_BYTES: usize = 72;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using bcrypt (blocking operation)
    ///
    /// CPU-intensive; in async contexts use `hash_async`.
    pub fn hash(password: &str) -> Result<String> {
        let truncated = Self::truncate(password);
        bcrypt::hash(truncated, DEFAULT_COST)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a hash (blocking operation)
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let truncated = Self::truncate(password);
        bcrypt::verify(truncated, hash)
            .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Verify a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool.
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    fn truncate(password: &str) -> &[u8] {
        let bytes = password.as_bytes();
        &bytes[..bytes.len().min(BCRYPT_MAX_BYTES)]
    }
}
