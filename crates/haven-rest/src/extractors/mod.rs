//! Custom Axum extractors.

mod auth;
mod validated;

pub use auth::*;
pub use validated::*;
