//! # Haven Service
//!
//! The cache-consistency layer and the marketplace operations built on it.
//!
//! Every read operation follows the same read-through protocol: compute the
//! key, try the cache, fall back to the repository and populate the cache.
//! Every mutation writes to the repository first and then invalidates (or
//! writes through) each cache entry it could have made stale.

pub mod auth_service;
pub mod cache;
pub mod cache_admin_service;
pub mod dto;
pub mod favorite_service;
pub mod r#impl;
pub mod property_service;
pub mod user_service;

pub use auth_service::*;
pub use cache::*;
pub use cache_admin_service::*;
pub use dto::*;
pub use favorite_service::*;
pub use r#impl::*;
pub use property_service::*;
pub use user_service::*;
