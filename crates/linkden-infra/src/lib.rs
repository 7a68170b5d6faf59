//! # Linkden Infrastructure
//!
//! Concrete implementations of the ports defined in `linkden-core`:
//! repositories, authentication services and the request rate limiter.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - in-memory repositories only

pub mod auth;
mod cache;
pub mod database;
pub mod rate_limit;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{InMemoryProfileRepository, InMemorySiteSettingsRepository, InMemoryUserRepository};
pub use rate_limit::{BucketPolicy, InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
