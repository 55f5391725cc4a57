//! Repository trait definitions.

use async_trait::async_trait;
use haven_core::{
    Favorite, FavoriteId, FavoriteWithProperty, HavenResult, Interface, ListingStatus, ListingType,
    Page, PageRequest, Property, PropertyId, PropertyType, User, UserId,
};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID, ignoring soft-deleted accounts.
    async fn find_by_id(&self, id: UserId) -> HavenResult<Option<User>>;

    /// Finds a user by username or (case-insensitive) email.
    async fn find_by_username_or_email(&self, identifier: &str) -> HavenResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> HavenResult<bool>;

    async fn exists_by_email(&self, email: &str) -> HavenResult<bool>;

    async fn save(&self, user: &User) -> HavenResult<User>;

    async fn update(&self, user: &User) -> HavenResult<User>;

    /// Soft deletes a user. Returns false if no row matched.
    async fn delete(&self, id: UserId) -> HavenResult<bool>;
}

/// Column a property search is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertySortField {
    #[default]
    CreatedAt,
    Price,
    Bedrooms,
    Area,
}

impl PropertySortField {
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Price => "price",
            Self::Bedrooms => "bedrooms",
            Self::Area => "area_sqft",
        }
    }
}

/// Filter for property searches. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    /// Free text matched against title and description.
    pub text: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub status: Option<ListingStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub sort_by: PropertySortField,
    pub descending: bool,
}

/// Property repository trait.
#[async_trait]
pub trait PropertyRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: PropertyId) -> HavenResult<Option<Property>>;

    async fn search(&self, filter: &PropertyFilter, page: PageRequest) -> HavenResult<Page<Property>>;

    /// Lists an owner's properties, newest first.
    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> HavenResult<Page<Property>>;

    async fn save(&self, property: &Property) -> HavenResult<Property>;

    async fn update(&self, property: &Property) -> HavenResult<Property>;

    /// Deletes a property and, through the foreign key, its favorites.
    async fn delete(&self, id: PropertyId) -> HavenResult<bool>;
}

/// Favorite repository trait.
#[async_trait]
pub trait FavoriteRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: FavoriteId) -> HavenResult<Option<Favorite>>;

    async fn find_by_user_and_property(
        &self,
        user_id: UserId,
        property_id: PropertyId,
    ) -> HavenResult<Option<Favorite>>;

    /// Lists a user's favorites with their properties, newest first.
    async fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> HavenResult<Page<FavoriteWithProperty>>;

    /// Inserts a favorite. A duplicate `(user, property)` pair is a conflict.
    async fn save(&self, favorite: &Favorite) -> HavenResult<Favorite>;

    async fn update(&self, favorite: &Favorite) -> HavenResult<Favorite>;

    async fn delete(&self, id: FavoriteId) -> HavenResult<bool>;
}
