//! JWT token provider for issuing and validating tokens.

use super::{Claims, TokenSubject, TokenType};
use chrono::{Duration, Utc};
use haven_config::SecurityConfig;
use haven_core::{HavenError, HavenResult, Interface};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// Access and refresh tokens issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    /// Always "Bearer".
    pub token_type: String,
}

/// Interface for issuing and validating tokens.
pub trait TokenProviderInterface: Interface + Send + Sync {
    /// Issues a fresh access/refresh pair for `subject`.
    fn generate_tokens(&self, subject: TokenSubject<'_>) -> HavenResult<TokenPair>;

    /// Validates signature, issuer, audience and expiry.
    fn validate_token(&self, token: &str) -> HavenResult<Claims>;

    fn validate_access_token(&self, token: &str) -> HavenResult<Claims>;

    fn validate_refresh_token(&self, token: &str) -> HavenResult<Claims>;
}

/// HS256 token provider configured from [`SecurityConfig`].
#[derive(Component, Clone)]
#[shaku(interface = TokenProviderInterface)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    #[must_use]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    #[must_use]
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    #[must_use]
    pub fn config(&self) -> Arc<SecurityConfig> {
        Arc::clone(&self.config)
    }

    fn lifetime(secs: u64) -> Duration {
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }

    fn sign(&self, subject: TokenSubject<'_>, token_type: TokenType, ttl: Duration) -> HavenResult<String> {
        let claims = Claims::issue(
            subject,
            token_type,
            &self.config.jwt_issuer,
            &self.config.jwt_audience,
            Utc::now() + ttl,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| HavenError::Internal(format!("Failed to sign {token_type} token: {e}")))
    }
}

impl TokenProviderInterface for TokenProvider {
    fn generate_tokens(&self, subject: TokenSubject<'_>) -> HavenResult<TokenPair> {
        let access_ttl = Self::lifetime(self.config.jwt_access_expiration_secs);
        let refresh_ttl = Self::lifetime(self.config.jwt_refresh_expiration_secs);

        let access_token = self.sign(subject, TokenType::Access, access_ttl)?;
        let refresh_token = self.sign(subject, TokenType::Refresh, refresh_ttl)?;

        debug!("Issued token pair for user {}", subject.user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: access_ttl.num_seconds(),
            token_type: "Bearer".to_string(),
        })
    }

    fn validate_token(&self, token: &str) -> HavenResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => HavenError::TokenExpired,
                    ErrorKind::InvalidSignature => {
                        HavenError::InvalidToken("Invalid token signature".to_string())
                    }
                    ErrorKind::InvalidIssuer => HavenError::InvalidToken("Invalid token issuer".to_string()),
                    ErrorKind::InvalidAudience => {
                        HavenError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => HavenError::InvalidToken(e.to_string()),
                }
            })
    }

    fn validate_access_token(&self, token: &str) -> HavenResult<Claims> {
        let claims = self.validate_token(token)?;
        if !claims.is_access_token() {
            return Err(HavenError::InvalidToken("Expected access token".to_string()));
        }
        Ok(claims)
    }

    fn validate_refresh_token(&self, token: &str) -> HavenResult<Claims> {
        let claims = self.validate_token(token)?;
        if !claims.is_refresh_token() {
            return Err(HavenError::InvalidToken("Expected refresh token".to_string()));
        }
        Ok(claims)
    }
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new(Arc::new(SecurityConfig::default()))
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}
