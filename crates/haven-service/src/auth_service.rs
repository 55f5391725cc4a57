//! Authentication service trait definition.

use crate::dto::{AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, UserProfile};
use async_trait::async_trait;
use haven_core::{HavenResult, Interface};
use haven_security::{Actor, Claims};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Registers a new account and signs it in.
    async fn register(&self, request: RegisterRequest) -> HavenResult<AuthResponse>;

    /// Logs in by username or email.
    async fn login(&self, request: LoginRequest) -> HavenResult<AuthResponse>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh_token(&self, request: RefreshTokenRequest) -> HavenResult<AuthResponse>;

    /// Validates an access token and returns its claims.
    async fn validate_token(&self, token: &str) -> HavenResult<Claims>;

    async fn logout(&self, actor: &Actor) -> HavenResult<MessageResponse>;

    async fn get_current_user(&self, actor: &Actor) -> HavenResult<UserProfile>;
}
