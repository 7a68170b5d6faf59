//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod health;
mod links;
mod profile;
mod settings;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::web;
use linkden_core::ports::{API_BUCKET, AUTH_BUCKET};

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimit;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/profile/{username}", web::get().to(profile::public_profile))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route(
                        "/register",
                        web::post()
                            .to(auth::register)
                            .wrap(RateLimit::new(AUTH_BUCKET)),
                    )
                    .route(
                        "/login",
                        web::post().to(auth::login).wrap(RateLimit::new(AUTH_BUCKET)),
                    )
                    .route("/me", web::get().to(auth::me)),
            )
            // Owner routes
            .service(
                web::resource("/settings")
                    .route(web::get().to(settings::get_settings))
                    .route(
                        web::put()
                            .to(settings::update_settings)
                            .wrap(RateLimit::new(API_BUCKET)),
                    ),
            )
            .service(
                web::resource("/links")
                    .route(web::get().to(links::list_links))
                    .route(
                        web::put()
                            .to(links::replace_links)
                            .wrap(RateLimit::new(API_BUCKET)),
                    ),
            )
            // Admin routes
            .service(
                web::scope("/admin")
                    .service(
                        web::resource("/settings")
                            .route(web::get().to(admin::get_site_settings))
                            .route(
                                web::put()
                                    .to(admin::update_site_settings)
                                    .wrap(RateLimit::new(AUTH_BUCKET)),
                            ),
                    )
                    .service(
                        web::resource("/users")
                            .wrap(RateLimit::new(AUTH_BUCKET))
                            .route(web::get().to(admin::list_users))
                            .route(web::delete().to(admin::delete_user)),
                    ),
            ),
    );
}
