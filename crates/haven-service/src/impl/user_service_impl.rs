//! User service implementation.

use crate::cache::{keys, CacheLookup, CacheService};
use crate::dto::{ChangePasswordRequest, UpdateProfileRequest, UserProfile};
use crate::user_service::UserService;
use async_trait::async_trait;
use haven_core::{HavenError, HavenResult, UserId, ValidateExt};
use haven_repository::UserRepository;
use haven_security::{Actor, PasswordHasherInterface};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// User service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheService>,
}

impl UserServiceComponent {
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            cache,
        }
    }
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn get_profile(&self, user_id: UserId) -> HavenResult<UserProfile> {
        if let CacheLookup::Hit(profile) = self.cache.get_cached_user_profile(user_id).await {
            return Ok(profile);
        }

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| HavenError::not_found("User", user_id))?;

        let profile = UserProfile::from(user);
        self.cache.cache_user_profile(&profile).await;
        Ok(profile)
    }

    async fn update_profile(&self, actor: &Actor, request: UpdateProfileRequest) -> HavenResult<UserProfile> {
        debug!("Updating profile: {}", actor.user_id);
        request.validate_request()?;

        let mut user = self
            .user_repository
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| HavenError::not_found("User", actor.user_id))?;

        user.update_profile(
            request.first_name,
            request.last_name,
            request.phone,
            request.avatar_url,
        );
        let updated = self.user_repository.update(&user).await?;

        let profile = UserProfile::from(updated);
        self.cache.cache_user_profile(&profile).await;

        info!("Profile updated: {}", actor.user_id);
        Ok(profile)
    }

    async fn change_password(&self, actor: &Actor, request: ChangePasswordRequest) -> HavenResult<()> {
        debug!("Changing password for user: {}", actor.user_id);
        request.validate_request()?;

        let mut user = self
            .user_repository
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| HavenError::not_found("User", actor.user_id))?;

        if !self
            .password_hasher
            .verify(&request.current_password, &user.password_hash)?
        {
            return Err(HavenError::InvalidCredentials);
        }

        let new_hash = self.password_hasher.hash(&request.new_password)?;
        user.update_password(new_hash);
        self.user_repository.update(&user).await?;

        // Credential changes never leave a cached profile behind.
        self.cache.invalidate_user_profile(actor.user_id).await;

        info!("Password changed for user: {}", actor.user_id);
        Ok(())
    }

    async fn delete_account(&self, actor: &Actor) -> HavenResult<()> {
        debug!("Deleting account: {}", actor.user_id);

        if !self.user_repository.delete(actor.user_id).await? {
            return Err(HavenError::not_found("User", actor.user_id));
        }

        self.cache.invalidate_user_profile(actor.user_id).await;
        self.cache
            .invalidate_pattern(&keys::scope_pattern(&actor.user_id.to_string()))
            .await;

        info!("Account deleted: {}", actor.user_id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent").finish_non_exhaustive()
    }
}
