//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use linkden_core::domain::{Profile, SiteSettings, User};
use linkden_core::error::RepoError;
use linkden_core::ports::{ProfileRepository, SiteSettingsRepository, UserRepository};

use super::entity::profile::{self, Entity as ProfileEntity};
use super::entity::site_settings::{self, Entity as SiteSettingsEntity, SETTINGS_ID};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL profile settings repository.
pub type PostgresProfileRepository = PostgresBaseRepository<ProfileEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_admins(&self) -> Result<u64, RepoError> {
        UserEntity::find()
            .filter(user::Column::IsAdmin.eq(true))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>, RepoError> {
        let result = ProfileEntity::find()
            .filter(profile::Column::Handle.eq(handle))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// PostgreSQL site settings repository (single row).
pub struct PostgresSiteSettingsRepository {
    db: DbConn,
}

impl PostgresSiteSettingsRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SiteSettingsRepository for PostgresSiteSettingsRepository {
    async fn get(&self) -> Result<SiteSettings, RepoError> {
        let result = SiteSettingsEntity::find_by_id(SETTINGS_ID)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(SiteSettings::from).unwrap_or_default())
    }

    async fn save(&self, settings: SiteSettings) -> Result<SiteSettings, RepoError> {
        let active_model: site_settings::ActiveModel = settings.clone().into();

        SiteSettingsEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(site_settings::Column::Id)
                    .update_columns([
                        site_settings::Column::RegistrationEnabled,
                        site_settings::Column::DisallowedDomains,
                        site_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(settings)
    }
}
