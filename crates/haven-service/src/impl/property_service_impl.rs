//! Property service implementation.

use crate::cache::{keys, CacheLookup, CacheService};
use crate::dto::{CreatePropertyRequest, PropertyPage, PropertySearchQuery, UpdatePropertyRequest};
use crate::property_service::PropertyService;
use async_trait::async_trait;
use haven_core::{HavenError, HavenResult, PageRequest, Property, PropertyId, UserId, ValidateExt};
use haven_repository::PropertyRepository;
use haven_security::Actor;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Property service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = PropertyService)]
pub struct PropertyServiceComponent {
    #[shaku(inject)]
    property_repository: Arc<dyn PropertyRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheService>,
}

impl PropertyServiceComponent {
    #[must_use]
    pub fn new(property_repository: Arc<dyn PropertyRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            property_repository,
            cache,
        }
    }

    /// Loads the authoritative row; ownership checks never use cached copies.
    async fn load(&self, id: PropertyId) -> HavenResult<Property> {
        self.property_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| HavenError::not_found("Property", id))
    }
}

#[async_trait]
impl PropertyService for PropertyServiceComponent {
    async fn create_property(&self, actor: &Actor, request: CreatePropertyRequest) -> HavenResult<Property> {
        request.validate_request()?;

        let property = request.into_property(actor.user_id);
        let saved = self.property_repository.save(&property).await?;

        self.cache
            .invalidate_property_cascade(saved.id, saved.owner_id)
            .await;
        self.cache.cache_property(&saved).await;

        info!("Property created: {} by {}", saved.id, actor.user_id);
        Ok(saved)
    }

    async fn get_property(&self, id: PropertyId) -> HavenResult<Property> {
        if let CacheLookup::Hit(property) = self.cache.get_cached_property(id).await {
            return Ok(property);
        }

        let property = self.load(id).await?;
        self.cache.cache_property(&property).await;
        Ok(property)
    }

    async fn update_property(
        &self,
        actor: &Actor,
        id: PropertyId,
        request: UpdatePropertyRequest,
    ) -> HavenResult<Property> {
        request.validate_request()?;

        let mut property = self.load(id).await?;
        actor.require_owner_or_admin(property.owner_id)?;

        request.apply_to(&mut property);
        let updated = self.property_repository.update(&property).await?;

        self.cache
            .invalidate_property_cascade(updated.id, updated.owner_id)
            .await;
        // Favorites pages embed a snapshot of the listing.
        self.cache
            .invalidate_pattern(&keys::all_user_favorites())
            .await;
        self.cache.cache_property(&updated).await;

        info!("Property updated: {} by {}", id, actor.user_id);
        Ok(updated)
    }

    async fn delete_property(&self, actor: &Actor, id: PropertyId) -> HavenResult<()> {
        let property = self.load(id).await?;
        actor.require_owner_or_admin(property.owner_id)?;

        if !self.property_repository.delete(id).await? {
            return Err(HavenError::not_found("Property", id));
        }

        self.cache
            .invalidate_property_cascade(id, property.owner_id)
            .await;
        // Favorites of the listing went with it.
        self.cache
            .invalidate_pattern(&keys::favorite_status_for_property_pattern(id))
            .await;
        self.cache
            .invalidate_pattern(&keys::all_user_favorites())
            .await;

        info!("Property deleted: {} by {}", id, actor.user_id);
        Ok(())
    }

    async fn search_properties(&self, query: PropertySearchQuery) -> HavenResult<PropertyPage> {
        query.validate_request()?;

        if let CacheLookup::Hit(page) = self.cache.get_cached_search_results(&query).await {
            return Ok(page);
        }

        debug!("Searching properties: {:?}", query);
        let page = PropertyPage::from(
            self.property_repository
                .search(&query.to_filter(), query.page_request())
                .await?,
        );
        self.cache.cache_search_results(&query, &page).await;
        Ok(page)
    }

    async fn list_user_properties(&self, owner_id: UserId, page: PageRequest) -> HavenResult<PropertyPage> {
        if let CacheLookup::Hit(cached) = self.cache.get_cached_user_properties(owner_id, page).await {
            return Ok(cached);
        }

        let results = PropertyPage::from(self.property_repository.find_by_owner(owner_id, page).await?);
        self.cache
            .cache_user_properties(owner_id, page, &results)
            .await;
        Ok(results)
    }
}

impl std::fmt::Debug for PropertyServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#impl::test_support::Fixture;
    use haven_core::{ListingStatus, ListingType, PropertyType, UserRole};

    fn service(fx: &Fixture) -> PropertyServiceComponent {
        PropertyServiceComponent::new(fx.db.clone(), fx.cache.clone())
    }

    fn create_request(title: &str) -> CreatePropertyRequest {
        CreatePropertyRequest {
            title: title.to_string(),
            description: "Bright and quiet".to_string(),
            property_type: PropertyType::House,
            listing_type: ListingType::Sale,
            status: None,
            price: 250_000.0,
            address: "3 Orchard Row".to_string(),
            city: "Bath".to_string(),
            state: "Somerset".to_string(),
            country: "UK".to_string(),
            postal_code: None,
            bedrooms: Some(3),
            bathrooms: Some(2),
            area_sqft: Some(1200.0),
            features: vec!["garden".to_string()],
            images: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_writes_through_and_drops_searches() {
        let fx = Fixture::new();
        let properties = service(&fx);
        let owner = Actor::new(UserId::new(), UserRole::User);

        properties
            .search_properties(PropertySearchQuery::default())
            .await
            .unwrap();
        assert_eq!(fx.store.keys("search:properties:*").len(), 1);

        let created = properties
            .create_property(&owner, create_request("Orchard cottage"))
            .await
            .unwrap();

        assert!(fx.store.keys("search:properties:*").is_empty());
        assert_eq!(
            fx.cache.get_cached_property(created.id).await,
            CacheLookup::Hit(created.clone())
        );
    }

    #[tokio::test]
    async fn test_get_property_reads_through() {
        let fx = Fixture::new();
        let listing = fx.listing(UserId::new(), "Canal loft", 180_000.0);
        let properties = service(&fx);

        assert_eq!(properties.get_property(listing.id).await.unwrap(), listing);
        assert_eq!(properties.get_property(listing.id).await.unwrap(), listing);
        assert_eq!(fx.db.reads(), 1);

        let err = properties.get_property(PropertyId::new()).await.unwrap_err();
        assert!(matches!(err, HavenError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_requires_owner_or_admin() {
        let fx = Fixture::new();
        let owner = UserId::new();
        let listing = fx.listing(owner, "Canal loft", 180_000.0);
        let properties = service(&fx);
        let request = UpdatePropertyRequest {
            status: Some(ListingStatus::Sold),
            ..Default::default()
        };

        let stranger = Actor::new(UserId::new(), UserRole::User);
        let err = properties
            .update_property(&stranger, listing.id, request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, HavenError::Forbidden(_)));

        let admin = Actor::new(UserId::new(), UserRole::Admin);
        let updated = properties
            .update_property(&admin, listing.id, request)
            .await
            .unwrap();
        assert_eq!(updated.status, ListingStatus::Sold);
    }

    #[tokio::test]
    async fn test_search_is_cached_per_query() {
        let fx = Fixture::new();
        fx.listing(UserId::new(), "Canal loft", 180_000.0);
        fx.listing(UserId::new(), "Mill house", 420_000.0);
        let properties = service(&fx);

        let cheap = PropertySearchQuery {
            max_price: Some(200_000.0),
            ..Default::default()
        };
        let first = properties.search_properties(cheap.clone()).await.unwrap();
        assert_eq!(first.pagination.total, 1);
        properties.search_properties(cheap).await.unwrap();
        assert_eq!(fx.db.reads(), 1);

        let all = properties
            .search_properties(PropertySearchQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
        assert_eq!(fx.db.reads(), 2);
    }

    #[tokio::test]
    async fn test_equivalent_searches_share_one_entry() {
        let fx = Fixture::new();
        fx.listing(UserId::new(), "Canal loft", 180_000.0);
        let properties = service(&fx);

        properties
            .search_properties(PropertySearchQuery::default())
            .await
            .unwrap();
        properties
            .search_properties(PropertySearchQuery {
                q: Some("  ".to_string()),
                page: Some(1),
                limit: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(fx.db.reads(), 1);
        assert_eq!(fx.store.keys("search:properties:*").len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_search_is_rejected() {
        let fx = Fixture::new();
        let query = PropertySearchQuery {
            limit: Some(500),
            ..Default::default()
        };
        let err = service(&fx).search_properties(query).await.unwrap_err();
        assert!(matches!(err, HavenError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_drops_favorite_status_for_the_listing() {
        let fx = Fixture::new();
        let owner = UserId::new();
        let fan = UserId::new();
        let listing = fx.listing(owner, "Canal loft", 180_000.0);
        fx.cache
            .cache_favorite_status(fan, listing.id, &crate::dto::FavoriteStatus::not_favorited())
            .await;

        service(&fx)
            .delete_property(&Actor::new(owner, UserRole::User), listing.id)
            .await
            .unwrap();

        assert!(fx.store.keys(&format!("*{}*", listing.id)).is_empty());
        assert!(fx.db.property(listing.id).is_none());
    }

    #[tokio::test]
    async fn test_mutations_succeed_without_cache() {
        let fx = Fixture::new();
        fx.store.set_available(false);
        let properties = service(&fx);
        let owner = Actor::new(UserId::new(), UserRole::User);

        let created = properties
            .create_property(&owner, create_request("Orchard cottage"))
            .await
            .unwrap();
        let fetched = properties.get_property(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        properties.delete_property(&owner, created.id).await.unwrap();
    }
}
