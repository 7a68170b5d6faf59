//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "postgres")]
use linkden_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `RUST_ENV` is `production` or `prod`.
    pub production: bool,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Account promoted to admin at startup.
    pub bootstrap_admin_email: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            production: env::var("RUST_ENV")
                .map(|v| matches!(v.to_lowercase().as_str(), "production" | "prod"))
                .unwrap_or(false),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL")
                .ok()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty()),
        }
    }
}
