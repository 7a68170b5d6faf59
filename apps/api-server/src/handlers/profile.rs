//! Public profile pages.

use actix_web::{HttpResponse, ResponseError, http::header, web};

use linkden_core::domain::Profile;
use linkden_core::ports::BaseRepository;
use linkden_shared::dto::PublicProfileResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const PRODUCTION_CACHE: &str = "public, max-age=300, stale-while-revalidate=60";
const NO_CACHE: &str = "no-cache";

async fn load_public_profile(
    state: &AppState,
    username: &str,
) -> AppResult<PublicProfileResponse> {
    let user = state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = state
        .profiles
        .find_by_id(user.id)
        .await?
        .unwrap_or_else(|| Profile::default_for(user.id, &user.username));

    Ok(PublicProfileResponse {
        username: user.username,
        handle: profile.handle,
        display_name: profile.display_name,
        profile_image: profile.profile_image,
        theme: profile.theme,
        links: user.links,
    })
}

/// GET /api/profile/{username}
///
/// Successful responses are cacheable in production; errors never are.
pub async fn public_profile(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let username = path.into_inner().to_lowercase();

    match load_public_profile(&state, &username).await {
        Ok(body) => {
            let cache_control = if state.production {
                PRODUCTION_CACHE
            } else {
                NO_CACHE
            };
            HttpResponse::Ok()
                .insert_header((header::CACHE_CONTROL, cache_control))
                .json(body)
        }
        Err(err) => {
            let mut response = err.error_response();
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                header::HeaderValue::from_static(NO_CACHE),
            );
            response
        }
    }
}
