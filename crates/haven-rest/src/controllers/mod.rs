//! REST API controllers.

pub mod auth_controller;
pub mod cache_controller;
pub mod favorite_controller;
pub mod health_controller;
pub mod property_controller;
pub mod user_controller;

pub use health_controller::*;

use crate::responses::AppError;
use haven_core::HavenError;
use std::str::FromStr;

/// Parses a typed id from a path segment.
fn parse_id<T: FromStr>(resource: &str, raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError(HavenError::validation(format!("Invalid {resource} ID: {raw}"))))
}
