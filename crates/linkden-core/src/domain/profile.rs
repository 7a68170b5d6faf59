use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Avatar used until the user sets their own.
pub const DEFAULT_PROFILE_IMAGE: &str = "/default-profile.png";

/// Visual theme of a public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background: String,
    pub accent: String,
    pub button_style: String,
    pub animation: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "bg-[#1a1625]".to_string(),
            accent: "violet".to_string(),
            button_style: "rounded-xl".to_string(),
            animation: "scale".to_string(),
        }
    }
}

/// Profile settings - everything a user customizes on their public page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    /// Display handle, always starting with `@`.
    pub handle: String,
    pub display_name: String,
    pub profile_image: String,
    pub theme: Theme,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Default profile created alongside a new account.
    pub fn default_for(user_id: Uuid, username: &str) -> Self {
        Self {
            user_id,
            handle: format!("@{}", username.to_lowercase()),
            display_name: username.to_string(),
            profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
            theme: Theme::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Normalize a requested handle to `@name` form and validate it.
///
/// A single leading `@` is optional on input. Allowed characters are ASCII
/// letters, digits, `_` and `-`; the result (including `@`) must be 3 to 30
/// characters long.
pub fn normalize_handle(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    let name = name.strip_prefix('@').unwrap_or(name);
    let handle = format!("@{}", name);

    let valid_chars = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_chars {
        return Err(DomainError::Validation(
            "Username can only contain letters, numbers, underscores, and dashes".to_string(),
        ));
    }
    if handle.len() < 3 {
        return Err(DomainError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }
    if handle.len() > 30 {
        return Err(DomainError::Validation(
            "Username cannot be longer than 30 characters".to_string(),
        ));
    }

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let id = Uuid::new_v4();
        let profile = Profile::default_for(id, "Alice");

        assert_eq!(profile.user_id, id);
        assert_eq!(profile.handle, "@alice");
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(profile.profile_image, DEFAULT_PROFILE_IMAGE);
        assert_eq!(profile.theme.accent, "violet");
    }

    #[test]
    fn test_normalize_handle_adds_at() {
        assert_eq!(normalize_handle("alice").unwrap(), "@alice");
        assert_eq!(normalize_handle("@alice").unwrap(), "@alice");
        assert_eq!(normalize_handle("  @my-name_2 ").unwrap(), "@my-name_2");
    }

    #[test]
    fn test_normalize_handle_rejects_bad_input() {
        assert!(normalize_handle("a").is_err());
        assert!(normalize_handle("@").is_err());
        assert!(normalize_handle("has space").is_err());
        assert!(normalize_handle("@@double").is_err());
        assert!(normalize_handle(&"x".repeat(30)).is_err());
        assert!(normalize_handle(&"x".repeat(29)).is_ok());
    }
}
