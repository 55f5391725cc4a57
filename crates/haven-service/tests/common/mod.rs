//! Service graph over in-memory repositories and an in-memory cache store.

#![allow(dead_code)]

use haven_core::{
    Email, ListingStatus, ListingType, Property, PropertyId, PropertyType, User, UserId, UserRole,
};
use haven_repository::MemoryDatabase;
use haven_security::{Actor, PasswordHasher};
use haven_service::{
    CacheService, CacheServiceImpl, CacheTtls, FavoriteServiceComponent, MemoryStore,
    PropertyServiceComponent, UserServiceComponent,
};
use std::sync::Arc;

pub struct Marketplace {
    pub db: Arc<MemoryDatabase>,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<dyn CacheService>,
    pub properties: PropertyServiceComponent,
    pub favorites: FavoriteServiceComponent,
    pub users: UserServiceComponent,
}

impl Marketplace {
    pub fn new() -> Self {
        Self::with_ttls(CacheTtls::default())
    }

    pub fn with_ttls(ttls: CacheTtls) -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let store = Arc::new(MemoryStore::new());
        let cache: Arc<dyn CacheService> = Arc::new(CacheServiceImpl::new(store.clone(), ttls));

        Self {
            properties: PropertyServiceComponent::new(db.clone(), cache.clone()),
            favorites: FavoriteServiceComponent::new(db.clone(), db.clone(), cache.clone()),
            users: UserServiceComponent::new(
                db.clone(),
                Arc::new(PasswordHasher::with_cost(1)),
                cache.clone(),
            ),
            db,
            store,
            cache,
        }
    }

    pub fn member(&self, username: &str) -> Actor {
        let user = User::new(
            username.to_string(),
            Email::new_unchecked(format!("{username}@example.com")),
            "unused".to_string(),
            None,
            None,
        );
        let actor = Actor::new(user.id, UserRole::User);
        self.db.insert_user(user);
        actor
    }

    pub fn listing(&self, owner_id: UserId, title: &str, price: f64) -> Property {
        let now = chrono::Utc::now();
        let property = Property {
            id: PropertyId::new(),
            owner_id,
            title: title.to_string(),
            description: String::new(),
            property_type: PropertyType::Townhouse,
            listing_type: ListingType::Sale,
            status: ListingStatus::Available,
            price,
            address: "7 Elm Terrace".to_string(),
            city: "Bristol".to_string(),
            state: "Bristol".to_string(),
            country: "UK".to_string(),
            postal_code: None,
            bedrooms: Some(3),
            bathrooms: Some(2),
            area_sqft: None,
            features: vec![],
            images: vec![],
            created_at: now,
            updated_at: now,
        };
        self.db.insert_property(property.clone());
        property
    }
}
