//! Cache administration implementation.

use crate::cache::{keys, StoreStats, VolatileStore};
use crate::cache_admin_service::CacheAdminService;
use crate::dto::{CacheClearResult, PingResponse};
use async_trait::async_trait;
use haven_core::{HavenError, HavenResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const UNAVAILABLE: &str = "Cache store is not available";

#[derive(Component)]
#[shaku(interface = CacheAdminService)]
pub struct CacheAdminServiceComponent {
    #[shaku(inject)]
    store: Arc<dyn VolatileStore>,
}

impl CacheAdminServiceComponent {
    #[must_use]
    pub fn new(store: Arc<dyn VolatileStore>) -> Self {
        Self { store }
    }

    /// Fails fast unless the store is up or answers a fresh ping.
    async fn ensure_available(&self) -> HavenResult<()> {
        if self.store.is_available() || self.store.ping().await {
            Ok(())
        } else {
            warn!("Cache administration refused: store unavailable");
            Err(HavenError::unavailable(UNAVAILABLE))
        }
    }

    async fn clear_pattern(&self, pattern: String) -> HavenResult<CacheClearResult> {
        self.ensure_available().await?;
        let removed = self
            .store
            .delete_by_pattern(&pattern)
            .await
            .ok_or_else(|| HavenError::unavailable(UNAVAILABLE))?;

        info!(pattern = %pattern, removed, "Cleared cache keys");
        Ok(CacheClearResult {
            scope: pattern,
            keys_removed: Some(removed),
        })
    }
}

#[async_trait]
impl CacheAdminService for CacheAdminServiceComponent {
    async fn stats(&self) -> HavenResult<StoreStats> {
        self.ensure_available().await?;
        self.store
            .stats()
            .await
            .ok_or_else(|| HavenError::unavailable(UNAVAILABLE))
    }

    async fn clear_all(&self) -> HavenResult<CacheClearResult> {
        self.ensure_available().await?;
        if !self.store.flush_all().await {
            return Err(HavenError::unavailable(UNAVAILABLE));
        }
        Ok(CacheClearResult {
            scope: "*".to_string(),
            keys_removed: None,
        })
    }

    async fn clear_scope(&self, id: &str) -> HavenResult<CacheClearResult> {
        let id = id.trim();
        if id.is_empty() || id.contains(['*', '?', '[', ']']) {
            return Err(HavenError::validation("Scope id must be a plain identifier"));
        }
        self.clear_pattern(keys::scope_pattern(id)).await
    }

    async fn clear_search(&self) -> HavenResult<CacheClearResult> {
        self.clear_pattern(keys::all_search_results()).await
    }

    async fn ping(&self) -> HavenResult<PingResponse> {
        let started = Instant::now();
        if !self.store.ping().await {
            return Err(HavenError::unavailable(UNAVAILABLE));
        }
        Ok(PingResponse {
            available: true,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }
}

impl std::fmt::Debug for CacheAdminServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAdminServiceComponent")
            .field("available", &self.store.is_available())
            .finish()
    }
}
