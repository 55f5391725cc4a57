//! Application state for Axum handlers.

use haven_core::HealthCheck;
use haven_service::{AuthService, CacheAdminService, FavoriteService, PropertyService, UserService};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub property_service: Arc<dyn PropertyService>,
    pub favorite_service: Arc<dyn FavoriteService>,
    pub cache_admin_service: Arc<dyn CacheAdminService>,
    /// Dependencies probed by `/ready`.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module
            + HasComponent<dyn AuthService>
            + HasComponent<dyn UserService>
            + HasComponent<dyn PropertyService>
            + HasComponent<dyn FavoriteService>
            + HasComponent<dyn CacheAdminService>,
    {
        Self {
            auth_service: module.resolve(),
            user_service: module.resolve(),
            property_service: module.resolve(),
            favorite_service: module.resolve(),
            cache_admin_service: module.resolve(),
            health_checks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
