//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use linkden_core::domain::{Profile, User, validate_username};
use linkden_core::ports::{BaseRepository, PasswordService, TokenService};
use linkden_infra::database::mask_email;
use linkden_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        is_admin: user.is_admin,
        created_at: user.created_at.to_rfc3339(),
    }
}

fn auth_response(token_service: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let token = token_service
        .generate_token(user.id, &user.email, &user.username, user.roles())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
        user: user_response(user),
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim();
    let email = req.email.trim().to_lowercase();

    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let site = state.site_settings.get().await?;
    if !site.registration_enabled {
        return Err(AppError::Forbidden(
            "Registration is currently disabled".to_string(),
        ));
    }

    // Validate input
    validate_username(username)?;
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if !site.allows_email(&email) {
        return Err(AppError::Forbidden(
            "Registration from this email domain is not allowed".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if state.users.find_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password_service.hash(&req.password)?;

    let user = state
        .users
        .create(User::new(username, &email, password_hash))
        .await?;
    state
        .profiles
        .create(Profile::default_for(user.id, username))
        .await?;

    tracing::info!(user_id = %user.id, user_email = %mask_email(&user.email), "User registered");

    let response = auth_response(token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        tracing::debug!(user_email = %mask_email(&user.email), "Password mismatch");
        return Err(AppError::Unauthorized);
    }

    let response = auth_response(token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}
