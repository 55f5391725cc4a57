//! JWT claims carried by Haven access and refresh tokens.

use chrono::{DateTime, Utc};
use haven_core::{HavenError, HavenResult, UserId, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every token issued by [`crate::TokenProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    /// Unique token id.
    pub jti: String,
}

/// Identity fields copied into a fresh set of claims.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: UserId,
    pub username: &'a str,
    pub email: &'a str,
    pub role: UserRole,
}

impl Claims {
    /// Builds claims of the given type expiring at `expires_at`.
    #[must_use]
    pub fn issue(
        subject: TokenSubject<'_>,
        token_type: TokenType,
        issuer: &str,
        audience: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.user_id.to_string(),
            username: subject.username.to_string(),
            email: subject.email.to_string(),
            role: subject.role,
            token_type,
            iat: now,
            exp: expires_at.timestamp(),
            nbf: now,
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Parses the subject back into a [`UserId`].
    pub fn user_id(&self) -> HavenResult<UserId> {
        UserId::parse(&self.sub)
            .map_err(|_| HavenError::InvalidToken("token subject is not a user id".to_string()))
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks if the token's role is at least `required`.
    #[must_use]
    pub const fn has_role(&self, required: UserRole) -> bool {
        self.role.has_permission(required)
    }

    #[must_use]
    pub const fn is_access_token(&self) -> bool {
        matches!(self.token_type, TokenType::Access)
    }

    #[must_use]
    pub const fn is_refresh_token(&self) -> bool {
        matches!(self.token_type, TokenType::Refresh)
    }
}

/// Token type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived, sent with API requests.
    Access,
    /// Long-lived, exchanged for a new pair.
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}
