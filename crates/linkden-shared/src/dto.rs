//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

use linkden_core::domain::{Link, Theme};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account information, never including the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// The caller's own profile settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettingsResponse {
    pub handle: String,
    pub display_name: String,
    pub profile_image: String,
    pub theme: Theme,
    pub updated_at: String,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub handle: Option<String>,
    pub profile_image: Option<String>,
    pub theme: Option<Theme>,
}

/// An ordered link list, used both to read and to replace links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksPayload {
    pub links: Vec<Link>,
}

/// Everything a public page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub username: String,
    pub handle: String,
    pub display_name: String,
    pub profile_image: String,
    pub theme: Theme,
    pub links: Vec<Link>,
}

/// Site-wide registration policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsResponse {
    pub registration_enabled: bool,
    pub disallowed_domains: Vec<String>,
}

/// Admin update of the registration policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteSettingsRequest {
    pub registration_enabled: Option<bool>,
    pub disallowed_domains: Option<Vec<String>>,
}

/// Admin request to delete an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
