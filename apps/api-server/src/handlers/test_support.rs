//! Helpers for handler tests: in-memory state, cheap hashing, seeded users.

use std::sync::Arc;

use actix_web::web;
use linkden_core::domain::{Profile, User};
use linkden_core::ports::{BaseRepository, PasswordService, TokenService};
use linkden_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use linkden_infra::rate_limit::{InMemoryRateLimiter, RateLimitConfig};

use crate::state::AppState;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestContext {
    pub state: AppState,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl TestContext {
    /// Limits as configured in production.
    pub fn new() -> Self {
        Self::with(RateLimitConfig::default(), false)
    }

    /// Rate limiting off, as in development.
    pub fn unlimited() -> Self {
        Self::with(
            RateLimitConfig {
                disabled: true,
                ..RateLimitConfig::default()
            },
            false,
        )
    }

    pub fn with(rate_limit: RateLimitConfig, production: bool) -> Self {
        Self {
            state: AppState::in_memory(Arc::new(InMemoryRateLimiter::new(rate_limit)), production),
            tokens: Arc::new(JwtTokenService::new(JwtConfig {
                secret: "handler-tests".to_string(),
                ..JwtConfig::default()
            })),
            passwords: Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap()),
        }
    }

    /// App data and routes, for `App::new().configure(..)`.
    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) + 'static {
        let state = self.state.clone();
        let tokens = self.tokens.clone();
        let passwords = self.passwords.clone();

        move |cfg| {
            cfg.app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens))
                .app_data(web::Data::new(passwords));
            super::configure_routes(cfg);
        }
    }

    /// Store a user with [`PASSWORD`] and a default profile; returns a bearer token.
    pub async fn seed_user(&self, username: &str, is_admin: bool) -> (User, String) {
        let hash = self.passwords.hash(PASSWORD).unwrap();
        let mut user = User::new(username, &format!("{}@example.com", username), hash);
        user.is_admin = is_admin;

        let user = self.state.users.create(user).await.unwrap();
        self.state
            .profiles
            .create(Profile::default_for(user.id, &user.username))
            .await
            .unwrap();

        let token = self
            .tokens
            .generate_token(user.id, &user.email, &user.username, user.roles())
            .unwrap();
        (user, format!("Bearer {}", token))
    }
}
