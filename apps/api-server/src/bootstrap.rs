//! Startup tasks.

use linkden_core::error::RepoError;
use linkden_core::ports::{BaseRepository, UserRepository};
use linkden_infra::database::mask_email;

/// Grant the admin flag to the account registered under `email`.
///
/// Returns whether the account was changed. A missing account is not an
/// error: the operator may set the variable before registering.
pub async fn promote_admin(users: &dyn UserRepository, email: &str) -> Result<bool, RepoError> {
    let masked = mask_email(email);

    let Some(mut user) = users.find_by_email(email).await? else {
        tracing::warn!(user_email = %masked, "Bootstrap admin account not found");
        return Ok(false);
    };

    if user.is_admin {
        tracing::debug!(user_email = %masked, "Bootstrap admin already has the admin flag");
        return Ok(false);
    }

    user.is_admin = true;
    user.touch();
    users.update(user).await?;

    tracing::info!(user_email = %masked, "Promoted bootstrap admin");
    Ok(true)
}
