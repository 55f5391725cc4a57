//! Typed cache operations per resource family.

use super::codec;
use super::keys;
use super::store::{CacheLookup, VolatileStore};
use crate::dto::{FavoritePage, FavoriteStatus, PropertyPage, PropertySearchQuery, UserProfile};
use async_trait::async_trait;
use haven_core::{Interface, PageRequest, Property, PropertyId, UserId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const PROPERTY_TTL: Duration = Duration::from_secs(900);
pub const USER_PROFILE_TTL: Duration = Duration::from_secs(1800);
pub const SEARCH_RESULTS_TTL: Duration = Duration::from_secs(300);
pub const USER_LIST_TTL: Duration = Duration::from_secs(600);
pub const FAVORITE_STATUS_TTL: Duration = Duration::from_secs(600);

/// Expiry applied to each cache family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub property: Duration,
    pub user_profile: Duration,
    pub search_results: Duration,
    pub user_properties: Duration,
    pub user_favorites: Duration,
    pub favorite_status: Duration,
}

impl CacheTtls {
    /// Every family expiring after the same duration.
    #[must_use]
    pub const fn uniform(ttl: Duration) -> Self {
        Self {
            property: ttl,
            user_profile: ttl,
            search_results: ttl,
            user_properties: ttl,
            user_favorites: ttl,
            favorite_status: ttl,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            property: PROPERTY_TTL,
            user_profile: USER_PROFILE_TTL,
            search_results: SEARCH_RESULTS_TTL,
            user_properties: USER_LIST_TTL,
            user_favorites: USER_LIST_TTL,
            favorite_status: FAVORITE_STATUS_TTL,
        }
    }
}

/// Read, write and invalidate primitives for every cached resource family.
///
/// Every operation is best-effort. Reads report [`CacheLookup::Miss`] or
/// [`CacheLookup::Unavailable`] instead of failing; writes and invalidations
/// return whether the store acknowledged them. Callers never branch on a
/// write result for correctness.
#[async_trait]
pub trait CacheService: Interface {
    async fn get_cached_property(&self, id: PropertyId) -> CacheLookup<Property>;
    async fn cache_property(&self, property: &Property) -> bool;
    async fn invalidate_property(&self, id: PropertyId) -> bool;

    async fn get_cached_user_profile(&self, user_id: UserId) -> CacheLookup<UserProfile>;
    async fn cache_user_profile(&self, profile: &UserProfile) -> bool;
    async fn invalidate_user_profile(&self, user_id: UserId) -> bool;

    async fn get_cached_search_results(&self, query: &PropertySearchQuery) -> CacheLookup<PropertyPage>;
    async fn cache_search_results(&self, query: &PropertySearchQuery, results: &PropertyPage) -> bool;
    /// Drops every cached search result.
    async fn invalidate_search_results(&self) -> bool;

    async fn get_cached_user_properties(&self, user_id: UserId, page: PageRequest) -> CacheLookup<PropertyPage>;
    async fn cache_user_properties(&self, user_id: UserId, page: PageRequest, results: &PropertyPage) -> bool;
    /// Drops every cached page of the user's properties.
    async fn invalidate_user_properties(&self, user_id: UserId) -> bool;

    async fn get_cached_user_favorites(&self, user_id: UserId, page: PageRequest) -> CacheLookup<FavoritePage>;
    async fn cache_user_favorites(&self, user_id: UserId, page: PageRequest, results: &FavoritePage) -> bool;
    /// Drops every cached page of the user's favorites.
    async fn invalidate_user_favorites(&self, user_id: UserId) -> bool;

    async fn get_cached_favorite_status(&self, user_id: UserId, property_id: PropertyId) -> CacheLookup<FavoriteStatus>;
    async fn cache_favorite_status(&self, user_id: UserId, property_id: PropertyId, status: &FavoriteStatus) -> bool;
    async fn invalidate_favorite_status(&self, user_id: UserId, property_id: PropertyId) -> bool;

    /// Deletes every key matching a glob pattern.
    async fn invalidate_pattern(&self, pattern: &str) -> bool;

    fn is_available(&self) -> bool;

    /// Everything a property mutation can make stale: the property itself,
    /// all search results and the owner's property lists.
    async fn invalidate_property_cascade(&self, property_id: PropertyId, owner_id: UserId) -> bool;

    /// Writes the new favorite status through and drops the user's
    /// favorites lists.
    async fn record_favorite_change(&self, user_id: UserId, property_id: PropertyId, status: &FavoriteStatus) -> bool;
}

/// [`CacheService`] over a [`VolatileStore`] using the JSON codec.
#[derive(Component)]
#[shaku(interface = CacheService)]
pub struct CacheServiceImpl {
    #[shaku(inject)]
    store: Arc<dyn VolatileStore>,
    ttls: CacheTtls,
}

impl CacheServiceImpl {
    #[must_use]
    pub fn new(store: Arc<dyn VolatileStore>, ttls: CacheTtls) -> Self {
        Self { store, ttls }
    }

    async fn read<T: DeserializeOwned>(&self, family: &'static str, key: &str) -> CacheLookup<T> {
        match self.store.get(key).await {
            CacheLookup::Hit(bytes) => match codec::decode(key, &bytes) {
                Some(value) => {
                    debug!(family, key, "Cache hit");
                    CacheLookup::Hit(value)
                }
                None => CacheLookup::Miss,
            },
            CacheLookup::Miss => {
                debug!(family, key, "Cache miss");
                CacheLookup::Miss
            }
            CacheLookup::Unavailable => {
                debug!(family, key, "Cache unavailable, reading through");
                CacheLookup::Unavailable
            }
        }
    }

    async fn write<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        match codec::encode(value) {
            Ok(bytes) => self.store.set_with_expiry(key, &bytes, ttl).await,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode cache entry");
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        self.store.delete(key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> bool {
        match self.store.delete_by_pattern(pattern).await {
            Some(removed) => {
                debug!(pattern, removed, "Invalidated cache pattern");
                true
            }
            None => false,
        }
    }

    fn search_key(query: &PropertySearchQuery) -> Option<String> {
        keys::search_properties(&query.normalized())
            .map_err(|e| warn!(error = %e, "Failed to fingerprint search query"))
            .ok()
    }
}

#[async_trait]
impl CacheService for CacheServiceImpl {
    async fn get_cached_property(&self, id: PropertyId) -> CacheLookup<Property> {
        self.read("property", &keys::property(id)).await
    }

    async fn cache_property(&self, property: &Property) -> bool {
        self.write(&keys::property(property.id), property, self.ttls.property)
            .await
    }

    async fn invalidate_property(&self, id: PropertyId) -> bool {
        self.delete(&keys::property(id)).await
    }

    async fn get_cached_user_profile(&self, user_id: UserId) -> CacheLookup<UserProfile> {
        self.read("user_profile", &keys::user_profile(user_id)).await
    }

    async fn cache_user_profile(&self, profile: &UserProfile) -> bool {
        self.write(&keys::user_profile(profile.id), profile, self.ttls.user_profile)
            .await
    }

    async fn invalidate_user_profile(&self, user_id: UserId) -> bool {
        self.delete(&keys::user_profile(user_id)).await
    }

    async fn get_cached_search_results(&self, query: &PropertySearchQuery) -> CacheLookup<PropertyPage> {
        match Self::search_key(query) {
            Some(key) => self.read("search", &key).await,
            None => CacheLookup::Miss,
        }
    }

    async fn cache_search_results(&self, query: &PropertySearchQuery, results: &PropertyPage) -> bool {
        match Self::search_key(query) {
            Some(key) => self.write(&key, results, self.ttls.search_results).await,
            None => false,
        }
    }

    async fn invalidate_search_results(&self) -> bool {
        self.delete_pattern(&keys::all_search_results()).await
    }

    async fn get_cached_user_properties(&self, user_id: UserId, page: PageRequest) -> CacheLookup<PropertyPage> {
        self.read("user_properties", &keys::user_properties(user_id, page))
            .await
    }

    async fn cache_user_properties(&self, user_id: UserId, page: PageRequest, results: &PropertyPage) -> bool {
        self.write(
            &keys::user_properties(user_id, page),
            results,
            self.ttls.user_properties,
        )
        .await
    }

    async fn invalidate_user_properties(&self, user_id: UserId) -> bool {
        self.delete_pattern(&keys::user_properties_pattern(user_id))
            .await
    }

    async fn get_cached_user_favorites(&self, user_id: UserId, page: PageRequest) -> CacheLookup<FavoritePage> {
        self.read("user_favorites", &keys::user_favorites(user_id, page))
            .await
    }

    async fn cache_user_favorites(&self, user_id: UserId, page: PageRequest, results: &FavoritePage) -> bool {
        self.write(
            &keys::user_favorites(user_id, page),
            results,
            self.ttls.user_favorites,
        )
        .await
    }

    async fn invalidate_user_favorites(&self, user_id: UserId) -> bool {
        self.delete_pattern(&keys::user_favorites_pattern(user_id))
            .await
    }

    async fn get_cached_favorite_status(&self, user_id: UserId, property_id: PropertyId) -> CacheLookup<FavoriteStatus> {
        self.read("favorite_status", &keys::favorite_status(user_id, property_id))
            .await
    }

    async fn cache_favorite_status(&self, user_id: UserId, property_id: PropertyId, status: &FavoriteStatus) -> bool {
        self.write(
            &keys::favorite_status(user_id, property_id),
            status,
            self.ttls.favorite_status,
        )
        .await
    }

    async fn invalidate_favorite_status(&self, user_id: UserId, property_id: PropertyId) -> bool {
        self.delete(&keys::favorite_status(user_id, property_id)).await
    }

    async fn invalidate_pattern(&self, pattern: &str) -> bool {
        self.delete_pattern(pattern).await
    }

    fn is_available(&self) -> bool {
        self.store.is_available()
    }

    async fn invalidate_property_cascade(&self, property_id: PropertyId, owner_id: UserId) -> bool {
        let (own, searches, lists) = futures::join!(
            self.invalidate_property(property_id),
            self.invalidate_search_results(),
            self.invalidate_user_properties(owner_id),
        );
        own && searches && lists
    }

    async fn record_favorite_change(&self, user_id: UserId, property_id: PropertyId, status: &FavoriteStatus) -> bool {
        let (written, lists) = futures::join!(
            self.cache_favorite_status(user_id, property_id, status),
            self.invalidate_user_favorites(user_id),
        );
        written && lists
    }
}

impl std::fmt::Debug for CacheServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheServiceImpl")
            .field("ttls", &self.ttls)
            .finish_non_exhaustive()
    }
}
