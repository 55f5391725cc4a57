//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::cache::CacheService;
use crate::dto::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, UserProfile,
};
use crate::user_service::UserService;
use async_trait::async_trait;
use haven_core::{Email, HavenError, HavenResult, User, UserStatus, ValidateExt};
use haven_repository::UserRepository;
use haven_security::{Actor, Claims, PasswordHasherInterface, TokenProviderInterface, TokenSubject};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = AuthService)]
pub struct AuthServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    token_provider: Arc<dyn TokenProviderInterface>,
    #[shaku(inject)]
    user_service: Arc<dyn UserService>,
    #[shaku(inject)]
    cache: Arc<dyn CacheService>,
}

impl AuthServiceComponent {
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
        user_service: Arc<dyn UserService>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_provider,
            user_service,
            cache,
        }
    }

    fn auth_response(&self, user: &User) -> HavenResult<AuthResponse> {
        let tokens = self.token_provider.generate_tokens(TokenSubject {
            user_id: user.id,
            username: &user.username,
            email: user.email.as_str(),
            role: user.role,
        })?;

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            user: UserProfile::from(user),
        })
    }
}

fn login_refusal(status: UserStatus) -> HavenError {
    match status {
        UserStatus::Suspended => HavenError::Forbidden("Account is suspended".to_string()),
        UserStatus::Deleted => HavenError::InvalidCredentials,
        UserStatus::Active => HavenError::Forbidden("Account is not active".to_string()),
    }
}

#[async_trait]
impl AuthService for AuthServiceComponent {
    async fn register(&self, request: RegisterRequest) -> HavenResult<AuthResponse> {
        debug!("Registering user: {}", request.username);
        request.validate_request()?;

        if self.user_repository.exists_by_username(&request.username).await? {
            return Err(HavenError::Conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }
        if self.user_repository.exists_by_email(&request.email).await? {
            return Err(HavenError::Conflict(format!(
                "Email '{}' already exists",
                request.email
            )));
        }

        let email = Email::new(&request.email).map_err(|e| HavenError::Validation(e.to_string()))?;
        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(
            request.username,
            email,
            password_hash,
            request.first_name,
            request.last_name,
        );
        let saved = self.user_repository.save(&user).await?;

        let response = self.auth_response(&saved)?;
        self.cache.cache_user_profile(&response.user).await;

        info!("User registered: {}", saved.id);
        Ok(response)
    }

    async fn login(&self, request: LoginRequest) -> HavenResult<AuthResponse> {
        debug!("Login attempt for: {}", request.username_or_email);
        request.validate_request()?;

        let mut user = self
            .user_repository
            .find_by_username_or_email(&request.username_or_email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown account {}", request.username_or_email);
                HavenError::InvalidCredentials
            })?;

        if !user.can_login() {
            warn!("Login refused: user {} is {}", user.id, user.status);
            return Err(login_refusal(user.status));
        }

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            warn!("Login failed: invalid password for {}", user.id);
            return Err(HavenError::InvalidCredentials);
        }

        if self.password_hasher.needs_rehash(&user.password_hash) {
            user.update_password(self.password_hasher.hash(&request.password)?);
        }
        user.record_login();
        let user = match self.user_repository.update(&user).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Failed to record login for {}: {}", user.id, e);
                user
            }
        };

        let response = self.auth_response(&user)?;
        self.cache.cache_user_profile(&response.user).await;

        info!("User logged in: {}", user.id);
        Ok(response)
    }

    async fn refresh_token(&self, request: RefreshTokenRequest) -> HavenResult<AuthResponse> {
        request.validate_request()?;
        let claims = self
            .token_provider
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| HavenError::InvalidToken("User no longer exists".to_string()))?;

        if !user.can_login() {
            return Err(login_refusal(user.status));
        }

        debug!("Refreshed tokens for {}", user.id);
        self.auth_response(&user)
    }

    async fn validate_token(&self, token: &str) -> HavenResult<Claims> {
        self.token_provider.validate_access_token(token)
    }

    async fn logout(&self, actor: &Actor) -> HavenResult<MessageResponse> {
        // Tokens are stateless; clients discard them.
        info!("User logged out: {}", actor.user_id);
        Ok(MessageResponse::new("Logged out successfully"))
    }

    async fn get_current_user(&self, actor: &Actor) -> HavenResult<UserProfile> {
        self.user_service.get_profile(actor.user_id).await
    }
}

impl std::fmt::Debug for AuthServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceComponent").finish_non_exhaustive()
    }
}
