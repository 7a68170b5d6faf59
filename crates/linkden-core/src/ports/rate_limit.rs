//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Bucket guarding credential-sensitive operations (register, login, admin).
pub const AUTH_BUCKET: &str = "auth";

/// Bucket guarding general mutating operations.
pub const API_BUCKET: &str = "api";

/// Rate limiter trait - abstraction over rate limiting backends.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an attempt by `client_key` against the named bucket.
    ///
    /// `allowed == true` means the request may proceed. A denied attempt is
    /// not counted. Unknown bucket names are rejected with
    /// [`RateLimitError::InvalidBucket`].
    async fn check(&self, bucket: &str, client_key: &str)
    -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Attempts left in the current window after this one.
    pub remaining: u32,
    /// Time until the client's counter expires.
    pub reset_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Invalid rate limit bucket: {0}")]
    InvalidBucket(String),
}
