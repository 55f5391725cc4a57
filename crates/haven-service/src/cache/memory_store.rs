//! In-process volatile store honoring expiry and glob patterns.

use super::store::{CacheLookup, StoreStats, VolatileStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use shaku::Component;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Single-process [`VolatileStore`].
///
/// Availability can be switched off to exercise the degraded paths of the
/// cache layer; while off it behaves like an unreachable Redis.
#[derive(Component, Debug)]
#[shaku(interface = VolatileStore)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
    #[shaku(default = AtomicBool::new(true))]
    available: AtomicBool,
    hits: AtomicU64,
    misses: AtomicU64,
    commands: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            commands: AtomicU64::new(0),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Live keys matching `pattern`, sorted.
    #[must_use]
    pub fn keys(&self, pattern: &str) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .iter()
            .filter(|(key, (_, expires_at))| *expires_at > now && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .lock()
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > Instant::now())
    }

    fn admit(&self) -> bool {
        self.commands.fetch_add(1, Ordering::Relaxed);
        self.available.load(Ordering::Acquire)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VolatileStore for MemoryStore {
    async fn open(&self) -> bool {
        self.set_available(true);
        true
    }

    async fn close(&self) {
        self.set_available(false);
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    async fn get(&self, key: &str) -> CacheLookup<Vec<u8>> {
        if !self.admit() {
            return CacheLookup::Unavailable;
        }
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Hit(value.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Miss
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Miss
            }
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> bool {
        if !self.admit() {
            return false;
        }
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_vec(), Instant::now() + ttl));
        true
    }

    async fn delete(&self, key: &str) -> bool {
        if !self.admit() {
            return false;
        }
        self.entries.lock().remove(key);
        true
    }

    async fn delete_by_pattern(&self, pattern: &str) -> Option<u64> {
        if !self.admit() {
            return None;
        }
        let now = Instant::now();
        let mut removed = 0u64;
        // Expired entries are purged without being counted.
        self.entries.lock().retain(|key, (_, expires_at)| {
            if !glob_match(pattern, key) {
                return true;
            }
            if *expires_at > now {
                removed += 1;
            }
            false
        });
        Some(removed)
    }

    async fn ping(&self) -> bool {
        self.admit()
    }

    async fn stats(&self) -> Option<StoreStats> {
        if !self.admit() {
            return None;
        }
        let now = Instant::now();
        let entries = self.entries.lock();
        let live = entries.values().filter(|(_, expires_at)| *expires_at > now);
        let (count, bytes) = live.fold((0u64, 0u64), |(count, bytes), (value, _)| {
            (count + 1, bytes + value.len() as u64)
        });

        Some(StoreStats {
            connected: true,
            used_memory_human: Some(format!("{bytes}B")),
            used_memory_bytes: Some(bytes),
            total_keys: count,
            connected_clients: Some(1),
            total_commands_processed: Some(self.commands.load(Ordering::Relaxed)),
            keyspace_hits: Some(self.hits.load(Ordering::Relaxed)),
            keyspace_misses: Some(self.misses.load(Ordering::Relaxed)),
        })
    }

    async fn flush_all(&self) -> bool {
        if !self.admit() {
            return false;
        }
        self.entries.lock().clear();
        true
    }
}

/// Redis-style glob: `*` matches any run, `?` any single character.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
