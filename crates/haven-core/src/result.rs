//! Result type alias used across Haven crates.

use crate::HavenError;

/// A specialized `Result` type for Haven operations.
pub type HavenResult<T> = Result<T, HavenError>;
