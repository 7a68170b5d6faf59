use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Profile, SiteSettings, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with [`RepoError::Constraint`] on a unique clash.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with [`RepoError::NotFound`] if absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (lowercased) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their (lowercased) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<User>, RepoError>;

    /// Number of users with the admin flag.
    async fn count_admins(&self) -> Result<u64, RepoError>;
}

/// Profile settings repository, keyed by the owning user's ID.
#[async_trait]
pub trait ProfileRepository: BaseRepository<Profile, Uuid> {
    /// Find a profile by its `@handle`.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>, RepoError>;
}

/// Site-wide settings singleton.
#[async_trait]
pub trait SiteSettingsRepository: Send + Sync {
    /// Current settings, or the defaults when none were saved yet.
    async fn get(&self) -> Result<SiteSettings, RepoError>;

    /// Replace the stored settings.
    async fn save(&self, settings: SiteSettings) -> Result<SiteSettings, RepoError>;
}
