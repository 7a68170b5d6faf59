//! Profile settings of the signed-in user.

use actix_web::{HttpResponse, web};

use linkden_core::domain::{DEFAULT_PROFILE_IMAGE, Profile, normalize_handle};
use linkden_core::ports::BaseRepository;
use linkden_shared::dto::{ProfileSettingsResponse, UpdateProfileRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn settings_response(profile: Profile) -> ProfileSettingsResponse {
    ProfileSettingsResponse {
        handle: profile.handle,
        display_name: profile.display_name,
        profile_image: profile.profile_image,
        theme: profile.theme,
        updated_at: profile.updated_at.to_rfc3339(),
    }
}

/// GET /api/settings
///
/// Creates the default profile on first access.
pub async fn get_settings(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let profile = match state.profiles.find_by_id(identity.user_id).await? {
        Some(profile) => profile,
        None => {
            tracing::info!(user_id = %identity.user_id, "Creating default profile settings");
            state
                .profiles
                .create(Profile::default_for(identity.user_id, &identity.username))
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(settings_response(profile)))
}

/// PUT /api/settings
pub async fn update_settings(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut profile = state
        .profiles
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Settings not found".to_string()))?;

    if let Some(raw) = req.handle {
        let handle = normalize_handle(&raw)?;
        let owner = state.profiles.find_by_handle(&handle).await?;
        if owner.is_some_and(|p| p.user_id != identity.user_id) {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        profile.handle = handle;
    }

    if let Some(name) = req.display_name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Display name cannot be empty".to_string(),
            ));
        }
        profile.display_name = name.to_string();
    }

    if let Some(image) = req.profile_image {
        let image = image.trim();
        profile.profile_image = if image.is_empty() {
            DEFAULT_PROFILE_IMAGE.to_string()
        } else {
            image.to_string()
        };
    }

    if let Some(theme) = req.theme {
        profile.theme = theme;
    }

    profile.touch();
    let profile = state.profiles.update(profile).await?;

    Ok(HttpResponse::Ok().json(settings_response(profile)))
}
