//! Cache-consistency layer.
//!
//! ```text
//! domain service ──► CacheService ──► codec ──► VolatileStore ──► Redis
//!                         │
//!                         └── keys (key shapes and invalidation globs)
//! ```
//!
//! The durable store is the source of truth. Domain services read through
//! the cache and, after each mutation, write fresh values through and drop
//! every key that could have gone stale. A missing or failing store only
//! ever turns into cache misses.

mod cache_service;
pub mod codec;
pub mod keys;
mod memory_store;
mod redis_store;
mod store;

pub use cache_service::{
    CacheService, CacheServiceImpl, CacheServiceImplParameters, CacheTtls, FAVORITE_STATUS_TTL,
    PROPERTY_TTL, SEARCH_RESULTS_TTL, USER_LIST_TTL, USER_PROFILE_TTL,
};
pub use memory_store::{MemoryStore, MemoryStoreParameters};
pub use redis_store::{Liveness, RedisStore, RedisStoreParameters};
pub use store::{CacheLookup, StoreHealth, StoreStats, VolatileStore};
