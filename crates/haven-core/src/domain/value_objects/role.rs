//! Account role value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account roles, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Browses listings and keeps favorites.
    #[default]
    User,
    /// Publishes and manages listings.
    Agent,
    /// Full access, including cache administration.
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::User => 1,
            Self::Agent => 2,
            Self::Admin => 3,
        }
    }

    /// Checks if this role has at least the permissions of `required`.
    #[must_use]
    pub const fn has_permission(&self, required: Self) -> bool {
        self.level() >= required.level()
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            "admin" | "administrator" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.has_permission(UserRole::Agent));
        assert!(UserRole::Agent.has_permission(UserRole::User));
        assert!(!UserRole::User.has_permission(UserRole::Admin));
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [UserRole::User, UserRole::Agent, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("root".parse::<UserRole>().is_err());
    }
}
