//! Authenticated caller extractors.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use haven_core::{HavenError, UserRole};
use haven_security::{Actor, Claims, ClaimsExt};

/// The caller identified by a valid access token.
///
/// Claims are placed in the request extensions by
/// [`crate::middleware::auth_middleware`]; their absence means the request
/// carried no token or an invalid one.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
    pub actor: Actor,
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.actor
    }
}

fn authenticate(parts: &Parts) -> Result<AuthenticatedUser, AppError> {
    let claims = parts
        .extensions
        .get::<Claims>()
        .cloned()
        .ok_or_else(|| HavenError::unauthorized("Missing or invalid access token"))?;
    let actor = claims.actor()?;
    Ok(AuthenticatedUser { claims, actor })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts)
    }
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts)?;
        user.actor.require_role(UserRole::Admin)?;
        Ok(Self(user))
    }
}
