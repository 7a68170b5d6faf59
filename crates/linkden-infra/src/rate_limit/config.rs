//! Bucket policies for the rate limiter.

use std::time::Duration;

use linkden_core::ports::{API_BUCKET, AUTH_BUCKET};

/// Limit applied to one named bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPolicy {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Credential-sensitive operations.
    pub auth: BucketPolicy,
    /// General mutating operations.
    pub api: BucketPolicy,
    /// Maximum tracked clients per bucket.
    pub capacity: usize,
    /// Development mode: every request is allowed.
    pub disabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth: BucketPolicy {
                max_requests: 5,
                window: Duration::from_secs(60 * 60),
            },
            api: BucketPolicy {
                max_requests: 30,
                window: Duration::from_secs(60),
            },
            capacity: 500,
            disabled: false,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source, falling back to
    /// defaults for missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let policy = |max_key: &str, window_key: &str, fallback: BucketPolicy| BucketPolicy {
            max_requests: parsed(max_key)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(fallback.max_requests),
            window: parsed(window_key)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(fallback.window),
        };

        Self {
            auth: policy(
                "RATE_LIMIT_AUTH_MAX",
                "RATE_LIMIT_AUTH_WINDOW_SECS",
                defaults.auth,
            ),
            api: policy(
                "RATE_LIMIT_API_MAX",
                "RATE_LIMIT_API_WINDOW_SECS",
                defaults.api,
            ),
            capacity: parsed("RATE_LIMIT_CACHE_CAPACITY")
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.capacity),
            disabled: lookup("RUST_ENV")
                .map(|v| matches!(v.to_lowercase().as_str(), "development" | "dev"))
                .unwrap_or(false),
        }
    }

    /// Every configured bucket with its policy.
    pub fn buckets(&self) -> [(&'static str, BucketPolicy); 2] {
        [(AUTH_BUCKET, self.auth), (API_BUCKET, self.api)]
    }
}
