//! Volatile key-value store seam.

use async_trait::async_trait;
use haven_core::{HealthCheck, HealthStatus, Interface};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

/// Outcome of a cache read.
///
/// `Unavailable` means the store could not be asked; callers treat it
/// exactly like `Miss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
    Unavailable,
}

impl<T> CacheLookup<T> {
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Unavailable => None,
        }
    }

    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CacheLookup<U> {
        match self {
            Self::Hit(value) => CacheLookup::Hit(f(value)),
            Self::Miss => CacheLookup::Miss,
            Self::Unavailable => CacheLookup::Unavailable,
        }
    }
}

/// Aggregate statistics reported by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub connected: bool,
    pub used_memory_human: Option<String>,
    pub used_memory_bytes: Option<u64>,
    pub total_keys: u64,
    pub connected_clients: Option<u64>,
    pub total_commands_processed: Option<u64>,
    pub keyspace_hits: Option<u64>,
    pub keyspace_misses: Option<u64>,
}

impl StoreStats {
    /// Builds stats from the text of a Redis `INFO` reply and a `DBSIZE` count.
    #[must_use]
    pub fn from_info(info: &str, total_keys: u64) -> Self {
        let fields: HashMap<&str, &str> = info
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| line.trim().split_once(':'))
            .collect();
        let number = |name: &str| fields.get(name).and_then(|v| v.parse::<u64>().ok());

        Self {
            connected: true,
            used_memory_human: fields.get("used_memory_human").map(ToString::to_string),
            used_memory_bytes: number("used_memory"),
            total_keys,
            connected_clients: number("connected_clients"),
            total_commands_processed: number("total_commands_processed"),
            keyspace_hits: number("keyspace_hits"),
            keyspace_misses: number("keyspace_misses"),
        }
    }
}

/// Liveness-aware key-value store holding cache entries.
///
/// No operation returns an error: failures are logged by the adapter and
/// surface as `Unavailable`, `false` or `None`.
#[async_trait]
pub trait VolatileStore: Interface {
    /// Connects and performs a handshake. Returns whether the store is ready.
    async fn open(&self) -> bool;

    /// Releases the connection pool. Later calls see the store as unavailable.
    async fn close(&self);

    /// Whether the last known connection state is ready.
    fn is_available(&self) -> bool;

    async fn get(&self, key: &str) -> CacheLookup<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous value, expiring after `ttl`.
    /// Returns whether the store acknowledged the write.
    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> bool;

    /// Returns whether the delete was acknowledged (a missing key still counts).
    async fn delete(&self, key: &str) -> bool;

    /// Resolves `pattern` to a snapshot of keys and deletes them.
    /// Returns the number of keys removed, or `None` if the store could not be asked.
    async fn delete_by_pattern(&self, pattern: &str) -> Option<u64>;

    async fn ping(&self) -> bool;

    async fn stats(&self) -> Option<StoreStats>;

    /// Removes every key in the store.
    async fn flush_all(&self) -> bool;
}

/// Readiness probe over a [`VolatileStore`].
///
/// An unreachable store only degrades the service: reads fall through to the
/// database.
#[derive(Clone)]
pub struct StoreHealth(Arc<dyn VolatileStore>);

impl StoreHealth {
    #[must_use]
    pub fn new(store: Arc<dyn VolatileStore>) -> Self {
        Self(store)
    }
}

#[async_trait]
impl HealthCheck for StoreHealth {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if self.0.is_available() || self.0.ping().await {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded("cache store unavailable; reads go to the database".to_string())
        }
    }
}
