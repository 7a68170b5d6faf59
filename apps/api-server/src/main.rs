//! # Linkden API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use linkden_core::ports::{PasswordService, TokenService};
use linkden_infra::auth::{Argon2PasswordService, JwtTokenService};

mod bootstrap;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Linkden API Server on {}:{} (production: {})",
        config.host,
        config.port,
        config.production
    );

    // Build application state
    let state = AppState::new(&config).await;

    if let Some(email) = &config.bootstrap_admin_email {
        if let Err(e) = bootstrap::promote_admin(state.users.as_ref(), email).await {
            tracing::error!(error = %e, "Failed to promote bootstrap admin");
        }
    }

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::from_env());

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
