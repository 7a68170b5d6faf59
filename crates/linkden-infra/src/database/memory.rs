//! In-memory repositories, used when no database is configured and in tests.
//!
//! Data lives for the lifetime of the process. Uniqueness rules match the
//! PostgreSQL schema so handlers behave the same against either backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use linkden_core::domain::{Profile, SiteSettings, User};
use linkden_core::error::RepoError;
use linkden_core::ports::{
    BaseRepository, ProfileRepository, SiteSettingsRepository, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn user_conflict(users: &HashMap<Uuid, User>, candidate: &User) -> Option<RepoError> {
    users
        .values()
        .filter(|existing| existing.id != candidate.id)
        .find_map(|existing| {
            if existing.email == candidate.email {
                Some(RepoError::Constraint("email already registered".to_string()))
            } else if existing.username == candidate.username {
                Some(RepoError::Constraint("username already taken".to_string()))
            } else {
                None
            }
        })
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepoError::Constraint("user id already exists".to_string()));
        }
        if let Some(err) = user_conflict(&users, &user) {
            return Err(err);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(err) = user_conflict(&users, &user) {
            return Err(err);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = email.to_lowercase();
        let users = self.users.read().await;

        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let username = username.to_lowercase();
        let users = self.users.read().await;

        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let mut all: Vec<User> = self.users.read().await.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn count_admins(&self) -> Result<u64, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.is_admin).count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn handle_taken(profiles: &HashMap<Uuid, Profile>, candidate: &Profile) -> bool {
    profiles
        .values()
        .any(|p| p.user_id != candidate.user_id && p.handle == candidate.handle)
}

#[async_trait]
impl BaseRepository<Profile, Uuid> for InMemoryProfileRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn create(&self, profile: Profile) -> Result<Profile, RepoError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.user_id) {
            return Err(RepoError::Constraint("profile already exists".to_string()));
        }
        if handle_taken(&profiles, &profile) {
            return Err(RepoError::Constraint("handle already taken".to_string()));
        }

        profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: Profile) -> Result<Profile, RepoError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.user_id) {
            return Err(RepoError::NotFound);
        }
        if handle_taken(&profiles, &profile) {
            return Err(RepoError::Constraint("handle already taken".to_string()));
        }

        profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), RepoError> {
        self.profiles
            .write()
            .await
            .remove(&user_id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>, RepoError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.handle == handle).cloned())
    }
}

#[derive(Default)]
pub struct InMemorySiteSettingsRepository {
    settings: RwLock<Option<SiteSettings>>,
}

impl InMemorySiteSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SiteSettingsRepository for InMemorySiteSettingsRepository {
    async fn get(&self) -> Result<SiteSettings, RepoError> {
        Ok(self.settings.read().await.clone().unwrap_or_default())
    }

    async fn save(&self, settings: SiteSettings) -> Result<SiteSettings, RepoError> {
        *self.settings.write().await = Some(settings.clone());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User::new(username, email, "hash".to_string())
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("Alice", "Alice@Example.com")).await.unwrap();

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(repo.find_by_email("ALICE@example.com").await.unwrap().is_some());
        assert!(repo.find_by_username("ALICE").await.unwrap().is_some());
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_or_username_is_a_constraint_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice", "alice@example.com")).await.unwrap();

        let same_email = repo.create(user("alice2", "alice@example.com")).await;
        assert!(matches!(same_email, Err(RepoError::Constraint(_))));

        let same_name = repo.create(user("alice", "other@example.com")).await;
        assert!(matches!(same_name, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();

        let result = repo.update(user("ghost", "ghost@example.com")).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_count_admins_and_list_order() {
        let repo = InMemoryUserRepository::new();
        let mut first = user("first", "first@example.com");
        first.is_admin = true;
        let mut second = user("second", "second@example.com");
        second.created_at = first.created_at + chrono::TimeDelta::seconds(1);

        repo.create(second).await.unwrap();
        repo.create(first).await.unwrap();

        assert_eq!(repo.count_admins().await.unwrap(), 1);
        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("alice", "alice@example.com")).await.unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(matches!(repo.delete(created.id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_profile_handle_must_be_unique() {
        let repo = InMemoryProfileRepository::new();
        let alice = Profile::default_for(Uuid::new_v4(), "alice");
        repo.create(alice.clone()).await.unwrap();

        let mut bob = Profile::default_for(Uuid::new_v4(), "bob");
        repo.create(bob.clone()).await.unwrap();

        bob.handle = alice.handle.clone();
        assert!(matches!(repo.update(bob).await, Err(RepoError::Constraint(_))));

        let found = repo.find_by_handle("@alice").await.unwrap().unwrap();
        assert_eq!(found.user_id, alice.user_id);
    }

    #[tokio::test]
    async fn test_site_settings_default_until_saved() {
        let repo = InMemorySiteSettingsRepository::new();
        assert_eq!(repo.get().await.unwrap(), SiteSettings::default());

        let settings = SiteSettings {
            registration_enabled: false,
            disallowed_domains: vec!["spam.com".to_string()],
        };
        repo.save(settings.clone()).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), settings);
    }
}
