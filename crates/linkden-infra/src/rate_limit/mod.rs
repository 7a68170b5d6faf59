//! Rate limiting implementations.

mod config;
mod memory;

pub use config::{BucketPolicy, RateLimitConfig};
pub use memory::InMemoryRateLimiter;
