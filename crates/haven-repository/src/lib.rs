//! # Haven Repository
//!
//! Durable storage for accounts, listings and favorites.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PropertyRepository>   (domain interface, traits.rs)
//! MySqlPropertyRepository            (SQLx implementation, mysql/)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```
//!
//! Repositories know nothing about caching; the service layer wraps them
//! with read-through and invalidation.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryDatabase;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
