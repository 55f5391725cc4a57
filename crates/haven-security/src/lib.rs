//! # Haven Security
//!
//! Argon2id password hashing, JWT access/refresh token issuing and
//! validation, and role/ownership checks over token claims.

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::*;
pub use password::*;
pub use rbac::*;
