//! # Haven Config
//!
//! Layered configuration (TOML files, `.env`, `HAVEN_*` environment
//! variables) and fail-fast validation.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
