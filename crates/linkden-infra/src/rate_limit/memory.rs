//! In-memory fixed-window rate limiter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use linkden_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::config::{BucketPolicy, RateLimitConfig};
use crate::cache::ExpiringLruCache;

struct Bucket {
    policy: BucketPolicy,
    counters: Mutex<ExpiringLruCache<String, u32>>,
}

/// Per-client request counters, one bounded expiring cache per bucket.
///
/// A counter starts at the first request in a fresh window and its window
/// restarts on every allowed request. Once it reaches the bucket maximum,
/// requests are denied without touching the counter until the entry expires.
/// A request at the very end of one window and one at the start of the next
/// are both allowed.
///
/// Limits are per-process, not shared between instances. Construct once at
/// startup and share it behind an `Arc`.
pub struct InMemoryRateLimiter {
    buckets: HashMap<&'static str, Bucket>,
    disabled: bool,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let buckets = config
            .buckets()
            .into_iter()
            .map(|(name, policy)| {
                let counters = ExpiringLruCache::new(config.capacity, policy.window);
                (
                    name,
                    Bucket {
                        policy,
                        counters: Mutex::new(counters),
                    },
                )
            })
            .collect();

        if config.disabled {
            tracing::warn!("Rate limiting disabled (development mode)");
        }

        Self {
            buckets,
            disabled: config.disabled,
        }
    }

    pub fn from_env() -> Self {
        Self::new(RateLimitConfig::from_env())
    }

    fn bucket(&self, name: &str) -> Result<&Bucket, RateLimitError> {
        self.buckets
            .get(name)
            .ok_or_else(|| RateLimitError::InvalidBucket(name.to_string()))
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(
        &self,
        bucket: &str,
        client_key: &str,
    ) -> Result<RateLimitResult, RateLimitError> {
        let Bucket { policy, counters } = self.bucket(bucket)?;

        if self.disabled {
            return Ok(RateLimitResult {
                allowed: true,
                remaining: policy.max_requests,
                reset_after: Duration::ZERO,
            });
        }

        // Read and write under one lock so parallel requests cannot lose updates.
        let mut counters = counters.lock().await;
        let count = counters.get(client_key).unwrap_or(0);

        if count >= policy.max_requests {
            let reset_after = counters
                .time_to_live(client_key)
                .unwrap_or(policy.window);
            tracing::debug!(bucket, client_key, count, "Rate limit reached");

            return Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after,
            });
        }

        counters.set(client_key.to_string(), count + 1);

        Ok(RateLimitResult {
            allowed: true,
            remaining: policy.max_requests - count - 1,
            reset_after: policy.window,
        })
    }
}
