//! Site administration: registration policy and account management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use linkden_core::domain::SiteSettings;
use linkden_core::error::RepoError;
use linkden_core::ports::BaseRepository;
use linkden_shared::dto::{
    DeleteUserRequest, MessageResponse, SiteSettingsResponse, UpdateSiteSettingsRequest,
    UserResponse,
};

use super::auth::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn site_settings_response(settings: SiteSettings) -> SiteSettingsResponse {
    SiteSettingsResponse {
        registration_enabled: settings.registration_enabled,
        disallowed_domains: settings.disallowed_domains,
    }
}

/// GET /api/admin/settings - public, the registration form reads it.
pub async fn get_site_settings(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let settings = state.site_settings.get().await?;
    Ok(HttpResponse::Ok().json(site_settings_response(settings)))
}

/// PUT /api/admin/settings
pub async fn update_site_settings(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateSiteSettingsRequest>,
) -> AppResult<HttpResponse> {
    let admin = identity.require_admin(&state).await?;
    let req = body.into_inner();

    if req.registration_enabled.is_none() && req.disallowed_domains.is_none() {
        return Err(AppError::BadRequest("No valid fields to update".to_string()));
    }

    let mut settings = state.site_settings.get().await?;
    if let Some(enabled) = req.registration_enabled {
        settings.registration_enabled = enabled;
    }
    if let Some(domains) = req.disallowed_domains {
        settings.disallowed_domains = SiteSettings::sanitize_domains(domains);
    }

    let settings = state.site_settings.save(settings).await?;
    tracing::info!(
        admin_id = %admin.id,
        registration_enabled = settings.registration_enabled,
        blocked_domains = settings.disallowed_domains.len(),
        "Site settings updated"
    );

    Ok(HttpResponse::Ok().json(site_settings_response(settings)))
}

/// GET /api/admin/users
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin(&state).await?;

    let users: Vec<UserResponse> = state.users.list().await?.iter().map(user_response).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// DELETE /api/admin/users
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<DeleteUserRequest>,
) -> AppResult<HttpResponse> {
    let admin = identity.require_admin(&state).await?;

    let raw_id = body.into_inner().user_id;
    if raw_id.trim().is_empty() {
        return Err(AppError::BadRequest("User ID is required".to_string()));
    }
    let user_id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))?;

    let target = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if target.is_admin && state.users.count_admins().await? <= 1 {
        return Err(AppError::BadRequest(
            "Cannot delete the last admin user".to_string(),
        ));
    }

    state.users.delete(user_id).await?;
    match state.profiles.delete(user_id).await {
        Ok(()) | Err(RepoError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(admin_id = %admin.id, deleted_user_id = %user_id, "User deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use linkden_core::ports::BaseRepository;
    use serde_json::json;

    use crate::handlers::test_support::TestContext;

    #[actix_web::test]
    async fn test_settings_are_public_but_updates_need_admin() {
        let ctx = TestContext::unlimited();
        let (_, user_token) = ctx.seed_user("nora", false).await;
        let (_, admin_token) = ctx.seed_user("olga", true).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/admin/settings").to_request(),
        )
        .await;
        assert_eq!(body["registrationEnabled"], true);

        let update = |token: &str| {
            test::TestRequest::put()
                .uri("/api/admin/settings")
                .insert_header(("Authorization", token.to_string()))
                .set_json(json!({
                    "registrationEnabled": false,
                    "disallowedDomains": ["Spam.com", "no", "bad domain.com", "spam.com"]
                }))
                .to_request()
        };

        let forbidden = test::call_service(&app, update(&user_token)).await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value =
            test::call_and_read_body_json(&app, update(&admin_token)).await;
        assert_eq!(body["registrationEnabled"], false);
        assert_eq!(body["disallowedDomains"], json!(["spam.com"]));

        let stored = ctx.state.site_settings.get().await.unwrap();
        assert!(!stored.registration_enabled);
    }

    #[actix_web::test]
    async fn test_empty_settings_update_is_rejected() {
        let ctx = TestContext::unlimited();
        let (_, admin_token) = ctx.seed_user("pam", true).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/admin/settings")
                .insert_header(("Authorization", admin_token))
                .set_json(json!({ "unrelated": 1 }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_users_hides_password_hashes() {
        let ctx = TestContext::unlimited();
        ctx.seed_user("quinn", false).await;
        let (_, admin_token) = ctx.seed_user("rosa", true).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/users")
                .insert_header(("Authorization", admin_token))
                .to_request(),
        )
        .await;

        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
        assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    }

    #[actix_web::test]
    async fn test_revoked_admin_is_forbidden() {
        let ctx = TestContext::unlimited();
        let (mut admin, token) = ctx.seed_user("sam", true).await;
        admin.is_admin = false;
        ctx.state.users.update(admin).await.unwrap();
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/users")
                .insert_header(("Authorization", token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_delete_user_and_profile() {
        let ctx = TestContext::unlimited();
        let (victim, _) = ctx.seed_user("tom", false).await;
        let (_, admin_token) = ctx.seed_user("uma", true).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let delete = |id: String| {
            test::TestRequest::delete()
                .uri("/api/admin/users")
                .insert_header(("Authorization", admin_token.clone()))
                .set_json(json!({ "userId": id }))
                .to_request()
        };

        let resp = test::call_service(&app, delete(victim.id.to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(ctx.state.users.find_by_id(victim.id).await.unwrap().is_none());
        assert!(ctx.state.profiles.find_by_id(victim.id).await.unwrap().is_none());

        let again = test::call_service(&app, delete(victim.id.to_string())).await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);

        let garbage = test::call_service(&app, delete("not-a-uuid".to_string())).await;
        assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_cannot_delete_last_admin() {
        let ctx = TestContext::unlimited();
        let (admin, token) = ctx.seed_user("vera", true).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/admin/users")
                .insert_header(("Authorization", token))
                .set_json(json!({ "userId": admin.id.to_string() }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(ctx.state.users.find_by_id(admin.id).await.unwrap().is_some());
    }
}
