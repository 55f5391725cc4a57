//! Shared fixtures for service unit tests.

use crate::cache::{CacheServiceImpl, CacheTtls, MemoryStore};
use haven_core::{
    Email, ListingStatus, ListingType, Property, PropertyId, PropertyType, User, UserId,
};
use haven_repository::MemoryDatabase;
use haven_security::{PasswordHasher, PasswordHasherInterface};
use std::sync::Arc;

pub(crate) struct Fixture {
    pub db: Arc<MemoryDatabase>,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<CacheServiceImpl>,
    pub hasher: Arc<PasswordHasher>,
}

impl Fixture {
    pub const PASSWORD: &'static str = "Secret1Pass";

    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            db: Arc::new(MemoryDatabase::new()),
            cache: Arc::new(CacheServiceImpl::new(store.clone(), CacheTtls::default())),
            store,
            hasher: Arc::new(PasswordHasher::with_cost(1)),
        }
    }

    /// Stores an active user whose password is [`Self::PASSWORD`].
    pub fn user(&self, username: &str) -> User {
        let hash = self.hasher.hash(Self::PASSWORD).unwrap();
        let user = User::new(
            username.to_string(),
            Email::new_unchecked(format!("{username}@example.com")),
            hash,
            None,
            None,
        );
        self.db.insert_user(user.clone());
        user
    }

    pub fn listing(&self, owner_id: UserId, title: &str, price: f64) -> Property {
        let now = chrono::Utc::now();
        let property = Property {
            id: PropertyId::new(),
            owner_id,
            title: title.to_string(),
            description: format!("{title} close to the station"),
            property_type: PropertyType::Apartment,
            listing_type: ListingType::Sale,
            status: ListingStatus::Available,
            price,
            address: "12 Canal Street".to_string(),
            city: "Manchester".to_string(),
            state: "Greater Manchester".to_string(),
            country: "UK".to_string(),
            postal_code: Some("M1 3HE".to_string()),
            bedrooms: Some(2),
            bathrooms: Some(1),
            area_sqft: Some(700.0),
            features: vec!["balcony".to_string()],
            images: vec![],
            created_at: now,
            updated_at: now,
        };
        self.db.insert_property(property.clone());
        property
    }
}
