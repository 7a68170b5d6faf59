//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use linkden_core::domain::User;
use linkden_core::ports::{AuthError, BaseRepository, TokenClaims, TokenService};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl Identity {
    /// Check if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Load the account behind this identity and require the admin flag.
    ///
    /// The token's roles are not trusted: the flag may have been revoked
    /// since the token was issued.
    pub async fn require_admin(&self, state: &AppState) -> AppResult<User> {
        let user = state
            .users
            .find_by_id(self.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_admin {
            if self.has_role("admin") {
                tracing::info!(user_id = %self.user_id, "Admin role revoked since token was issued");
            }
            tracing::warn!(user_id = %self.user_id, "Non-admin attempted an admin operation");
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(user)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::TokenExpired => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::MissingAuth => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => actix_web::http::StatusCode::FORBIDDEN,
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use linkden_shared::ErrorResponse;

        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::InsufficientPermissions => {
                ErrorResponse::forbidden("Insufficient permissions")
            }
            _ => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    let Some(token_service) = req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
    else {
        tracing::error!("TokenService not found in app data");
        return Err(AuthenticationError(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        )));
    };

    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthenticationError(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;

    // Parse "Bearer <token>"
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError(AuthError::InvalidToken(
            "Expected Bearer token".to_string(),
        ))
    })?;

    token_service
        .validate_token(token)
        .map(Identity::from)
        .map_err(AuthenticationError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web};
    use linkden_infra::auth::{JwtConfig, JwtTokenService};

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "identity-test".to_string(),
            ..JwtConfig::default()
        }))
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let req = test::TestRequest::default()
            .app_data(web::Data::new(token_service()))
            .to_http_request();

        let err = authenticate(&req).unwrap_err();
        assert!(matches!(err.0, AuthError::MissingAuth));
    }

    #[actix_web::test]
    async fn test_valid_bearer_token() {
        let tokens = token_service();
        let user_id = uuid::Uuid::new_v4();
        let token = tokens
            .generate_token(user_id, "a@example.com", "alice", vec!["user".to_string()])
            .unwrap();

        let req = test::TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let identity = authenticate(&req).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.username, "alice");
        assert!(identity.has_role("user"));
        assert!(!identity.has_role("admin"));
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let req = test::TestRequest::default()
            .app_data(web::Data::new(token_service()))
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();

        assert!(matches!(
            authenticate(&req).unwrap_err().0,
            AuthError::InvalidToken(_)
        ));
    }
}
