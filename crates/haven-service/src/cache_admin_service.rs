//! Cache administration trait definition.

use crate::cache::StoreStats;
use crate::dto::{CacheClearResult, PingResponse};
use async_trait::async_trait;
use haven_core::{HavenResult, Interface};

/// Operator view of the cache store.
///
/// Unlike the cache service, every operation here reports an unreachable
/// store as [`haven_core::HavenError::ServiceUnavailable`].
#[async_trait]
pub trait CacheAdminService: Interface + Send + Sync {
    async fn stats(&self) -> HavenResult<StoreStats>;

    /// Removes every key in the store.
    async fn clear_all(&self) -> HavenResult<CacheClearResult>;

    /// Removes every key that mentions `id` (a user or resource id).
    async fn clear_scope(&self, id: &str) -> HavenResult<CacheClearResult>;

    /// Removes every cached search result.
    async fn clear_search(&self) -> HavenResult<CacheClearResult>;

    async fn ping(&self) -> HavenResult<PingResponse>;
}
