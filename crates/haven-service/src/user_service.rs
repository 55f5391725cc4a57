//! User service trait definition.

use crate::dto::{ChangePasswordRequest, UpdateProfileRequest, UserProfile};
use async_trait::async_trait;
use haven_core::{HavenResult, Interface, UserId};
use haven_security::Actor;

/// Profile operations for signed-in users.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Gets a profile, served from the profile cache when present.
    async fn get_profile(&self, user_id: UserId) -> HavenResult<UserProfile>;

    /// Updates the caller's profile and overwrites the cached copy.
    async fn update_profile(&self, actor: &Actor, request: UpdateProfileRequest) -> HavenResult<UserProfile>;

    /// Changes the caller's password after verifying the current one.
    async fn change_password(&self, actor: &Actor, request: ChangePasswordRequest) -> HavenResult<()>;

    /// Soft deletes the caller's account and drops every key scoped to it.
    async fn delete_account(&self, actor: &Actor) -> HavenResult<()>;
}
