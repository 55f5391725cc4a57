//! In-memory repositories for tests.
//!
//! [`MemoryDatabase`] implements all three repository traits over shared
//! maps so favorites can join their properties and disappear with them.
//! It counts read queries, which lets callers assert that a path was served
//! from the cache.

use crate::traits::{
    FavoriteRepository, PropertyFilter, PropertyRepository, PropertySortField, UserRepository,
};
use async_trait::async_trait;
use haven_core::{
    Favorite, FavoriteId, FavoriteWithProperty, HavenError, HavenResult, Page, PageRequest,
    Property, PropertyId, User, UserId, UserStatus,
};
use parking_lot::Mutex;
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    users: Mutex<HashMap<UserId, User>>,
    properties: Mutex<HashMap<PropertyId, Property>>,
    favorites: Mutex<HashMap<FavoriteId, Favorite>>,
    reads: AtomicU64,
}

impl MemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read queries served so far.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn reset_reads(&self) {
        self.reads.store(0, Ordering::Relaxed);
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().insert(user.id, user);
    }

    pub fn insert_property(&self, property: Property) {
        self.properties.lock().insert(property.id, property);
    }

    /// Direct lookup that does not count as a read.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> Option<Property> {
        self.properties.lock().get(&id).cloned()
    }

    /// Direct lookup that does not count as a read.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.lock().get(&id).cloned()
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX).min(items.len());
    let end = start.saturating_add(page.limit as usize).min(items.len());
    let slice: Vec<T> = items.drain(start..end).collect();
    Page::new(slice, page, total)
}

fn matches(property: &Property, filter: &PropertyFilter) -> bool {
    let text_ok = filter.text.as_deref().map_or(true, |text| {
        let needle = text.to_lowercase();
        property.title.to_lowercase().contains(&needle)
            || property.description.to_lowercase().contains(&needle)
    });
    let eq = |wanted: &Option<String>, actual: &str| {
        wanted.as_deref().map_or(true, |w| w.eq_ignore_ascii_case(actual))
    };

    text_ok
        && eq(&filter.city, &property.city)
        && eq(&filter.state, &property.state)
        && eq(&filter.country, &property.country)
        && filter.property_type.map_or(true, |t| t == property.property_type)
        && filter.listing_type.map_or(true, |t| t == property.listing_type)
        && filter.status.map_or(true, |s| s == property.status)
        && filter.min_price.map_or(true, |min| property.price >= min)
        && filter.max_price.map_or(true, |max| property.price <= max)
        && filter.min_bedrooms.map_or(true, |min| property.bedrooms.unwrap_or(0) >= min)
        && filter.min_bathrooms.map_or(true, |min| property.bathrooms.unwrap_or(0) >= min)
}

fn compare(a: &Property, b: &Property, field: PropertySortField) -> CmpOrdering {
    match field {
        PropertySortField::CreatedAt => a.created_at.cmp(&b.created_at),
        PropertySortField::Price => a.price.total_cmp(&b.price),
        PropertySortField::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
        PropertySortField::Area => a
            .area_sqft
            .unwrap_or_default()
            .total_cmp(&b.area_sqft.unwrap_or_default()),
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn find_by_id(&self, id: UserId) -> HavenResult<Option<User>> {
        self.read();
        Ok(self
            .users
            .lock()
            .get(&id)
            .filter(|u| u.status != UserStatus::Deleted)
            .cloned())
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> HavenResult<Option<User>> {
        self.read();
        Ok(self
            .users
            .lock()
            .values()
            .find(|u| {
                u.status != UserStatus::Deleted
                    && (u.username == identifier || u.email.as_str().eq_ignore_ascii_case(identifier))
            })
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> HavenResult<bool> {
        self.read();
        Ok(self.users.lock().values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> HavenResult<bool> {
        self.read();
        Ok(self
            .users
            .lock()
            .values()
            .any(|u| u.email.as_str().eq_ignore_ascii_case(email)))
    }

    async fn save(&self, user: &User) -> HavenResult<User> {
        self.users.lock().insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> HavenResult<User> {
        let mut users = self.users.lock();
        if !users.contains_key(&user.id) {
            return Err(HavenError::not_found("User", user.id));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> HavenResult<bool> {
        Ok(self.users.lock().get_mut(&id).is_some_and(|user| {
            let live = user.status != UserStatus::Deleted;
            user.mark_deleted();
            live
        }))
    }
}

#[async_trait]
impl PropertyRepository for MemoryDatabase {
    async fn find_by_id(&self, id: PropertyId) -> HavenResult<Option<Property>> {
        self.read();
        Ok(self.properties.lock().get(&id).cloned())
    }

    async fn search(&self, filter: &PropertyFilter, page: PageRequest) -> HavenResult<Page<Property>> {
        self.read();
        let mut items: Vec<Property> = self
            .properties
            .lock()
            .values()
            .filter(|p| matches(p, filter))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            let order = compare(a, b, filter.sort_by);
            let order = if filter.descending { order.reverse() } else { order };
            order.then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(paginate(items, page))
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> HavenResult<Page<Property>> {
        self.read();
        let mut items: Vec<Property> = self
            .properties
            .lock()
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(paginate(items, page))
    }

    async fn save(&self, property: &Property) -> HavenResult<Property> {
        self.properties.lock().insert(property.id, property.clone());
        Ok(property.clone())
    }

    async fn update(&self, property: &Property) -> HavenResult<Property> {
        let mut properties = self.properties.lock();
        if !properties.contains_key(&property.id) {
            return Err(HavenError::not_found("Property", property.id));
        }
        properties.insert(property.id, property.clone());
        Ok(property.clone())
    }

    async fn delete(&self, id: PropertyId) -> HavenResult<bool> {
        let removed = self.properties.lock().remove(&id).is_some();
        if removed {
            self.favorites.lock().retain(|_, f| f.property_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryDatabase {
    async fn find_by_id(&self, id: FavoriteId) -> HavenResult<Option<Favorite>> {
        self.read();
        Ok(self.favorites.lock().get(&id).cloned())
    }

    async fn find_by_user_and_property(
        &self,
        user_id: UserId,
        property_id: PropertyId,
    ) -> HavenResult<Option<Favorite>> {
        self.read();
        Ok(self
            .favorites
            .lock()
            .values()
            .find(|f| f.user_id == user_id && f.property_id == property_id)
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> HavenResult<Page<FavoriteWithProperty>> {
        self.read();
        let properties = self.properties.lock();
        let mut items: Vec<FavoriteWithProperty> = self
            .favorites
            .lock()
            .values()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| {
                properties.get(&f.property_id).map(|p| FavoriteWithProperty {
                    favorite: f.clone(),
                    property: p.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| b.favorite.created_at.cmp(&a.favorite.created_at));
        Ok(paginate(items, page))
    }

    async fn save(&self, favorite: &Favorite) -> HavenResult<Favorite> {
        let mut favorites = self.favorites.lock();
        if favorites
            .values()
            .any(|f| f.user_id == favorite.user_id && f.property_id == favorite.property_id)
        {
            return Err(HavenError::conflict("Property is already in favorites"));
        }
        favorites.insert(favorite.id, favorite.clone());
        Ok(favorite.clone())
    }

    async fn update(&self, favorite: &Favorite) -> HavenResult<Favorite> {
        let mut favorites = self.favorites.lock();
        if !favorites.contains_key(&favorite.id) {
            return Err(HavenError::not_found("Favorite", favorite.id));
        }
        favorites.insert(favorite.id, favorite.clone());
        Ok(favorite.clone())
    }

    async fn delete(&self, id: FavoriteId) -> HavenResult<bool> {
        Ok(self.favorites.lock().remove(&id).is_some())
    }
}
