//! Password hashing using Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use haven_core::{HavenError, HavenResult, Interface};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Interface for password hashing operations.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password into a PHC string.
    fn hash(&self, password: &str) -> HavenResult<String>;

    /// Verifies a password against a PHC string. A wrong password is `Ok(false)`.
    fn verify(&self, password: &str, hash: &str) -> HavenResult<bool>;

    /// Checks if a stored hash was produced by another algorithm or cost.
    fn needs_rehash(&self, hash: &str) -> bool;
}

/// Argon2id hasher component.
#[derive(Component, Clone)]
#[shaku(interface = PasswordHasherInterface)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Builds a hasher whose time cost (iterations) is `cost`.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = Params::new(Params::DEFAULT_M_COST, cost.max(1), Params::DEFAULT_P_COST, None)
            .unwrap_or(Params::DEFAULT);
        Self::with_params(params)
    }

    /// Shared Argon2 instance, used to fill the component parameters.
    #[must_use]
    pub fn argon2_arc(&self) -> Arc<Argon2<'static>> {
        Arc::clone(&self.argon2)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> HavenResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HavenError::Internal(format!("Failed to hash password: {e}")))?;

        debug!("Password hashed");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> HavenResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| HavenError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed");
                Ok(false)
            }
            Err(e) => Err(HavenError::Internal(format!("Password verification error: {e}"))),
        }
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };
        if parsed.algorithm != argon2::Algorithm::Argon2id.ident() {
            return true;
        }
        let current = self.argon2.params();
        match Params::try_from(&parsed) {
            Ok(stored) => stored.t_cost() != current.t_cost() || stored.m_cost() != current.m_cost(),
            Err(_) => true,
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::with_cost(1)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        let hash = hasher.hash("Secur3Passw0rd").unwrap();
        assert!(hasher.verify("Secur3Passw0rd", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = fast();
        let first = hasher.hash("Passw0rdA").unwrap();
        let second = hasher.hash("Passw0rdA").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("Passw0rdA", &second).unwrap());
    }

    #[test]
    fn test_invalid_hash_format_returns_error() {
        assert!(fast().verify("password", "not-a-valid-hash").is_err());
    }

    #[test]
    fn test_needs_rehash() {
        let hasher = fast();
        let hash = hasher.hash("Passw0rdA").unwrap();
        assert!(!hasher.needs_rehash(&hash));
        assert!(hasher.needs_rehash("garbage-hash"));
        assert!(PasswordHasher::with_cost(2).needs_rehash(&hash));
    }

    #[test]
    fn test_debug_does_not_leak_params() {
        assert_eq!(format!("{:?}", fast()), "PasswordHasher { .. }");
    }
}
