//! Application state - shared across all handlers.

use std::sync::Arc;

use linkden_core::ports::{
    ProfileRepository, RateLimiter, SiteSettingsRepository, UserRepository,
};
use linkden_infra::database::{
    InMemoryProfileRepository, InMemorySiteSettingsRepository, InMemoryUserRepository,
};
use linkden_infra::rate_limit::InMemoryRateLimiter;

#[cfg(feature = "postgres")]
use linkden_infra::database::{
    DatabaseConnections, PostgresProfileRepository, PostgresSiteSettingsRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub site_settings: Arc<dyn SiteSettingsRepository>,
    /// Process-wide request counters, created once at startup.
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub production: bool,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let rate_limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::from_env());

        #[cfg(feature = "postgres")]
        let connected = Self::connect(config, &rate_limiter).await;

        #[cfg(not(feature = "postgres"))]
        let connected: Option<Self> = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            None
        };

        connected.unwrap_or_else(|| {
            tracing::info!("Application state initialized (in-memory)");
            Self::in_memory(rate_limiter, config.production)
        })
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig, rate_limiter: &Arc<dyn RateLimiter>) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                tracing::info!("Application state initialized (postgres)");
                Some(Self {
                    users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                    profiles: Arc::new(PostgresProfileRepository::new(conn.main.clone())),
                    site_settings: Arc::new(PostgresSiteSettingsRepository::new(
                        conn.main.clone(),
                    )),
                    rate_limiter: rate_limiter.clone(),
                    production: config.production,
                    db: Some(conn),
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(rate_limiter: Arc<dyn RateLimiter>, production: bool) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            profiles: Arc::new(InMemoryProfileRepository::new()),
            site_settings: Arc::new(InMemorySiteSettingsRepository::new()),
            rate_limiter,
            production,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// `None` when running without a database.
    pub async fn database_reachable(&self) -> Option<bool> {
        #[cfg(feature = "postgres")]
        let reachable = match &self.db {
            Some(db) => Some(db.ping().await),
            None => None,
        };

        #[cfg(not(feature = "postgres"))]
        let reachable = None;

        reachable
    }
}
