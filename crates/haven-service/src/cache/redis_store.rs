//! Redis-backed volatile store.

use super::store::{CacheLookup, StoreStats, VolatileStore};
use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands, RedisError, RedisResult};
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use haven_config::RedisConfig;
use parking_lot::{Mutex, RwLock};
use shaku::Component;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const MIN_RETRY_DELAY: Duration = Duration::from_millis(100);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Connection readiness as reported by the transport.
///
/// While down, operations are skipped until a retry deadline that doubles
/// after each consecutive failure.
#[derive(Debug, Default)]
pub struct Liveness {
    available: AtomicBool,
    failures: AtomicU32,
    retry_at: Mutex<Option<Instant>>,
}

impl Liveness {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Whether an operation may reach the store now.
    fn may_attempt(&self) -> bool {
        self.is_available() || self.retry_at.lock().map_or(true, |at| Instant::now() >= at)
    }

    fn mark_up(&self) {
        self.failures.store(0, Ordering::Release);
        *self.retry_at.lock() = None;
        if !self.available.swap(true, Ordering::AcqRel) {
            info!("Cache store connection is ready");
        }
    }

    fn mark_down(&self, reason: &str) {
        let failures = self.failures.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        let delay = MIN_RETRY_DELAY
            .saturating_mul(1 << failures.min(16).saturating_sub(1))
            .min(MAX_RETRY_DELAY);
        *self.retry_at.lock() = Some(Instant::now() + delay);

        if self.available.swap(false, Ordering::AcqRel) {
            warn!(reason, "Cache store connection lost");
        } else {
            debug!(reason, retry_in_ms = delay.as_millis() as u64, "Cache store still unreachable");
        }
    }

    fn reset(&self) {
        self.available.store(false, Ordering::Release);
        self.failures.store(0, Ordering::Release);
        *self.retry_at.lock() = None;
    }
}

/// Redis store over a `deadpool-redis` pool.
///
/// The pool is created on first use; creating it performs no I/O.
#[derive(Component)]
#[shaku(interface = VolatileStore)]
pub struct RedisStore {
    config: RedisConfig,
    pool: RwLock<Option<Pool>>,
    liveness: Liveness,
    closed: AtomicBool,
}

impl RedisStore {
    #[must_use]
    pub fn new(config: RedisConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
            liveness: Liveness::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// Component parameters for a not-yet-opened store.
    #[must_use]
    pub fn parameters(config: RedisConfig) -> RedisStoreParameters {
        RedisStoreParameters {
            config,
            pool: RwLock::new(None),
            liveness: Liveness::default(),
            closed: AtomicBool::new(false),
        }
    }

    fn pool(&self) -> Option<Pool> {
        if !self.config.enabled || self.closed.load(Ordering::Acquire) {
            return None;
        }
        if let Some(pool) = self.pool.read().as_ref() {
            return Some(pool.clone());
        }

        let mut slot = self.pool.write();
        if slot.is_none() {
            let mut pool_config = PoolConfig::new(self.config.pool_size as usize);
            pool_config.timeouts.wait = Some(self.config.connect_timeout());
            pool_config.timeouts.create = Some(self.config.connect_timeout());
            pool_config.timeouts.recycle = Some(self.config.op_timeout());

            let mut config = Config::from_url(&self.config.url);
            config.pool = Some(pool_config);

            match config.create_pool(Some(Runtime::Tokio1)) {
                Ok(pool) => *slot = Some(pool),
                Err(e) => {
                    warn!(error = %e, "Failed to create Redis pool");
                    return None;
                }
            }
        }
        slot.clone()
    }

    async fn connection(&self) -> Option<Connection> {
        if !self.liveness.may_attempt() {
            return None;
        }
        let pool = self.pool()?;
        match pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                self.liveness.mark_down(&e.to_string());
                None
            }
        }
    }

    /// Runs one store round trip bounded by the operation timeout.
    async fn run<T, F>(&self, command: &'static str, key: &str, fut: F) -> Option<T>
    where
        T: Send,
        F: Future<Output = RedisResult<T>> + Send,
    {
        match tokio::time::timeout(self.config.op_timeout(), fut).await {
            Ok(Ok(value)) => {
                self.liveness.mark_up();
                Some(value)
            }
            Ok(Err(e)) => {
                if is_connection_error(&e) {
                    self.liveness.mark_down(&e.to_string());
                }
                warn!(command, key, error = %e, "Cache store command failed");
                None
            }
            Err(_) => {
                warn!(command, key, timeout_ms = self.config.op_timeout_ms, "Cache store command timed out");
                None
            }
        }
    }
}

fn is_connection_error(e: &RedisError) -> bool {
    e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped()
}

#[async_trait]
impl VolatileStore for RedisStore {
    async fn open(&self) -> bool {
        if !self.config.enabled {
            info!("Redis cache disabled; running without a cache store");
            return false;
        }
        self.closed.store(false, Ordering::Release);
        self.liveness.reset();

        let ready = self.ping().await;
        if ready {
            info!(pool_size = self.config.pool_size, "Connected to Redis cache store");
        } else {
            warn!("Redis cache store unreachable at startup; continuing without cache");
        }
        ready
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(pool) = self.pool.write().take() {
            pool.close();
        }
        self.liveness.reset();
        info!("Redis cache store closed");
    }

    fn is_available(&self) -> bool {
        self.liveness.is_available()
    }

    async fn get(&self, key: &str) -> CacheLookup<Vec<u8>> {
        let Some(mut conn) = self.connection().await else {
            return CacheLookup::Unavailable;
        };
        match self.run("GET", key, conn.get::<_, Option<Vec<u8>>>(key)).await {
            Some(Some(bytes)) => CacheLookup::Hit(bytes),
            Some(None) => CacheLookup::Miss,
            None => CacheLookup::Unavailable,
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let seconds = ttl.as_secs().max(1);
        self.run("SETEX", key, conn.set_ex::<_, _, ()>(key, value, seconds))
            .await
            .is_some()
    }

    async fn delete(&self, key: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        self.run("DEL", key, conn.del::<_, i64>(key)).await.is_some()
    }

    async fn delete_by_pattern(&self, pattern: &str) -> Option<u64> {
        let mut conn = self.connection().await?;

        let keys: Vec<String> = self
            .run("KEYS", pattern, redis::cmd("KEYS").arg(pattern).query_async(&mut conn))
            .await?;
        if keys.is_empty() {
            return Some(0);
        }

        let deleted: i64 = self.run("DEL", pattern, conn.del(&keys)).await?;
        debug!(pattern, deleted, "Deleted keys by pattern");
        Some(u64::try_from(deleted).unwrap_or_default())
    }

    async fn ping(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let reply: Option<String> = self
            .run("PING", "", redis::cmd("PING").query_async(&mut conn))
            .await;
        reply.is_some_and(|pong| pong.eq_ignore_ascii_case("PONG"))
    }

    async fn stats(&self) -> Option<StoreStats> {
        let mut conn = self.connection().await?;
        let info: String = self
            .run("INFO", "", redis::cmd("INFO").query_async(&mut conn))
            .await?;
        let total_keys: u64 = self
            .run("DBSIZE", "", redis::cmd("DBSIZE").query_async(&mut conn))
            .await?;
        Some(StoreStats::from_info(&info, total_keys))
    }

    async fn flush_all(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let reply: Option<()> = self
            .run("FLUSHALL", "", redis::cmd("FLUSHALL").query_async(&mut conn))
            .await;
        let flushed = reply.is_some();
        if flushed {
            info!("Flushed every key from the cache store");
        }
        flushed
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("enabled", &self.config.enabled)
            .field("available", &self.liveness.is_available())
            .finish_non_exhaustive()
    }
}
