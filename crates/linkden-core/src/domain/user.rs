use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::link::Link;
use crate::error::DomainError;

/// User entity - an account owning a public profile and its links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Lowercased, unique. Also the path segment of the public profile.
    pub username: String,
    /// Lowercased, unique.
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    /// Ordered as shown on the public page.
    pub links: Vec<Link>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    ///
    /// Username and email are stored lowercased.
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.to_lowercase(),
            email: email.to_lowercase(),
            password_hash,
            is_admin: false,
            links: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles carried in access tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_admin {
            roles.push("admin".to_string());
        }
        roles
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Check a registration username: 3 to 20 ASCII letters, digits or underscores.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let valid_len = (3..=20).contains(&username.len());
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(DomainError::Validation("Invalid username format".to_string()))
    }
}
