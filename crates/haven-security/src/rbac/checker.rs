//! Role and ownership checks.

use crate::Claims;
use haven_core::{HavenError, HavenResult, UserId, UserRole};

/// The authenticated caller of a domain operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    #[must_use]
    pub fn is_owner(&self, resource_owner_id: UserId) -> bool {
        self.user_id == resource_owner_id
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    pub fn require_role(&self, role: UserRole) -> HavenResult<()> {
        if self.role.has_permission(role) {
            Ok(())
        } else {
            Err(HavenError::Forbidden(format!(
                "Required role: {}, your role: {}",
                role, self.role
            )))
        }
    }

    /// Passes for the resource owner or an administrator.
    pub fn require_owner_or_admin(&self, resource_owner_id: UserId) -> HavenResult<()> {
        if self.is_owner(resource_owner_id) || self.is_admin() {
            Ok(())
        } else {
            Err(HavenError::Forbidden(
                "You don't have permission to modify this resource".to_string(),
            ))
        }
    }

    /// Passes for the resource owner only.
    pub fn require_owner(&self, resource_owner_id: UserId) -> HavenResult<()> {
        if self.is_owner(resource_owner_id) {
            Ok(())
        } else {
            Err(HavenError::Forbidden("Resource belongs to another user".to_string()))
        }
    }
}

/// Extension trait for [`Claims`] permission checks.
pub trait ClaimsExt {
    /// Turns validated claims into an [`Actor`].
    fn actor(&self) -> HavenResult<Actor>;

    fn require_role(&self, role: UserRole) -> HavenResult<()>;

    fn require_admin(&self) -> HavenResult<()>;
}

impl ClaimsExt for Claims {
    fn actor(&self) -> HavenResult<Actor> {
        Ok(Actor::new(self.user_id()?, self.role))
    }

    fn require_role(&self, role: UserRole) -> HavenResult<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(HavenError::Forbidden(format!(
                "Required role: {}, your role: {}",
                role, self.role
            )))
        }
    }

    fn require_admin(&self) -> HavenResult<()> {
        self.require_role(UserRole::Admin)
    }
}
