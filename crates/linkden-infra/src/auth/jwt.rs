//! HS256 access tokens.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use linkden_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "linkden-api";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Signing configuration for access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Reads `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SECRET.to_string()),
            expiration_hours: lookup("JWT_EXPIRATION_HOURS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(DEFAULT_EXPIRATION_HOURS),
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
        };

        if config.uses_default_secret() {
            let production = lookup("RUST_ENV")
                .map(|v| matches!(v.to_lowercase().as_str(), "production" | "prod"))
                .unwrap_or(false);

            if production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        config
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Wire form of the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    username: String,
    roles: Vec<String>,
    exp: i64,
    iat: i64,
    iss: String,
}

impl TryFrom<Claims> for TokenClaims {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email,
            username: claims.username,
            roles: claims.roles,
            exp: claims.exp,
        })
    }
}

fn decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(err.to_string()),
    }
}

/// Issues and verifies bearer tokens for signed-in users.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        username: &str,
        roles: Vec<String>,
    ) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            roles,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(decode_error)?;

        TokenClaims::try_from(data.claims)
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn service(secret: &str, issuer: &str, expiration_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            expiration_hours,
            issuer: issuer.to_string(),
        })
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_admin_token_round_trip() {
        let tokens = service("profile-secret", "linkden-test", 1);
        let user_id = Uuid::new_v4();

        let token = tokens
            .generate_token(
                user_id,
                "alice@example.com",
                "alice",
                vec!["user".to_string(), "admin".to_string()],
            )
            .unwrap();
        let claims = tokens.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.roles, vec!["user".to_string(), "admin".to_string()]);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let tokens = service("profile-secret", "linkden-test", 1);

        assert!(matches!(
            tokens.validate_token("not.a.token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let forger = service("guessed-secret", "linkden-test", 1);
        let tokens = service("profile-secret", "linkden-test", 1);

        let forged = forger
            .generate_token(Uuid::new_v4(), "mallory@example.com", "mallory", vec![
                "admin".to_string(),
            ])
            .unwrap();

        assert!(matches!(
            tokens.validate_token(&forged),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let tokens = service("profile-secret", "linkden-test", -2);

        let token = tokens
            .generate_token(Uuid::new_v4(), "late@example.com", "late", vec![])
            .unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_other_issuer_is_rejected() {
        let staging = service("shared-secret", "linkden-staging", 1);
        let production = service("shared-secret", "linkden-api", 1);

        let token = staging
            .generate_token(Uuid::new_v4(), "dev@example.com", "dev", vec![])
            .unwrap();

        assert!(production.validate_token(&token).is_err());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = JwtConfig::from_lookup(lookup_from(&[]));
        assert!(config.uses_default_secret());
        assert_eq!(config.expiration_hours, 24);
        assert_eq!(config.issuer, "linkden-api");

        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_HOURS", "2"),
            ("JWT_ISSUER", "linkden-staging"),
        ]));
        assert!(!config.uses_default_secret());
        assert_eq!(config.expiration_hours, 2);
        assert_eq!(config.issuer, "linkden-staging");
        assert_eq!(JwtTokenService::new(config).expiration_seconds(), 7200);
    }

    #[test]
    fn test_non_positive_lifetime_falls_back_to_default() {
        let config = JwtConfig::from_lookup(lookup_from(&[("JWT_EXPIRATION_HOURS", "-5")]));
        assert_eq!(config.expiration_hours, 24);
    }
}
