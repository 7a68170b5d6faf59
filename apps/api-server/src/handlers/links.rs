//! Link list of the signed-in user.

use actix_web::{HttpResponse, web};

use linkden_core::domain::{User, validate_links};
use linkden_core::ports::BaseRepository;
use linkden_shared::dto::LinksPayload;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// GET /api/links
pub async fn list_links(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;

    Ok(HttpResponse::Ok().json(LinksPayload { links: user.links }))
}

/// PUT /api/links - replace the whole ordered list.
pub async fn replace_links(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LinksPayload>,
) -> AppResult<HttpResponse> {
    let links = validate_links(body.into_inner().links)?;

    let mut user = current_user(&state, &identity).await?;
    user.links = links;
    user.touch();
    let user = state.users.update(user).await?;

    tracing::debug!(user_id = %user.id, count = user.links.len(), "Links replaced");
    Ok(HttpResponse::Ok().json(LinksPayload { links: user.links }))
}
