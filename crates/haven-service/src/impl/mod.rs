//! Service implementations.
//!
//! Each component here implements a trait from the crate root (e.g.
//! `user_service.rs`) and receives its collaborators through Shaku.

mod auth_service_impl;
mod cache_admin_service_impl;
mod favorite_service_impl;
mod property_service_impl;
mod user_service_impl;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service_impl::{AuthServiceComponent, AuthServiceComponentParameters};
pub use cache_admin_service_impl::{CacheAdminServiceComponent, CacheAdminServiceComponentParameters};
pub use favorite_service_impl::{FavoriteServiceComponent, FavoriteServiceComponentParameters};
pub use property_service_impl::{PropertyServiceComponent, PropertyServiceComponentParameters};
pub use user_service_impl::{UserServiceComponent, UserServiceComponentParameters};
