//! Favorite service implementation.

use crate::cache::{CacheLookup, CacheService};
use crate::dto::{AddFavoriteRequest, FavoritePage, FavoriteStatus, UpdateFavoriteRequest};
use crate::favorite_service::FavoriteService;
use async_trait::async_trait;
use haven_core::{
    Favorite, FavoriteId, HavenError, HavenResult, PageRequest, PropertyId, ValidateExt,
};
use haven_repository::{FavoriteRepository, PropertyRepository};
use haven_security::Actor;
use shaku::Component;
use std::sync::Arc;
use tracing::info;

/// Favorite service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = FavoriteService)]
pub struct FavoriteServiceComponent {
    #[shaku(inject)]
    favorite_repository: Arc<dyn FavoriteRepository>,
    #[shaku(inject)]
    property_repository: Arc<dyn PropertyRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheService>,
}

impl FavoriteServiceComponent {
    #[must_use]
    pub fn new(
        favorite_repository: Arc<dyn FavoriteRepository>,
        property_repository: Arc<dyn PropertyRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            favorite_repository,
            property_repository,
            cache,
        }
    }

    /// Loads a favorite the actor owns.
    async fn owned(&self, actor: &Actor, id: FavoriteId) -> HavenResult<Favorite> {
        let favorite = self
            .favorite_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| HavenError::not_found("Favorite", id))?;
        actor.require_owner(favorite.user_id)?;
        Ok(favorite)
    }
}

#[async_trait]
impl FavoriteService for FavoriteServiceComponent {
    async fn add_favorite(&self, actor: &Actor, request: AddFavoriteRequest) -> HavenResult<Favorite> {
        request.validate_request()?;

        let property = self
            .property_repository
            .find_by_id(request.property_id)
            .await?
            .ok_or_else(|| HavenError::not_found("Property", request.property_id))?;
        if property.status.is_closed() {
            return Err(HavenError::BusinessRule(format!(
                "Property {} is {} and cannot be favorited",
                property.id, property.status
            )));
        }

        if self
            .favorite_repository
            .find_by_user_and_property(actor.user_id, property.id)
            .await?
            .is_some()
        {
            return Err(HavenError::Conflict("Property is already in favorites".to_string()));
        }

        let favorite = Favorite::new(actor.user_id, property.id, request.notes, request.tags);
        let saved = self.favorite_repository.save(&favorite).await?;

        self.cache
            .record_favorite_change(actor.user_id, property.id, &FavoriteStatus::favorited(saved.id))
            .await;

        info!("Favorite added: {} -> {}", actor.user_id, property.id);
        Ok(saved)
    }

    async fn remove_favorite(&self, actor: &Actor, id: FavoriteId) -> HavenResult<()> {
        let favorite = self.owned(actor, id).await?;

        if !self.favorite_repository.delete(id).await? {
            return Err(HavenError::not_found("Favorite", id));
        }

        self.cache
            .record_favorite_change(
                actor.user_id,
                favorite.property_id,
                &FavoriteStatus::not_favorited(),
            )
            .await;

        info!("Favorite removed: {} -> {}", actor.user_id, favorite.property_id);
        Ok(())
    }

    async fn update_favorite(
        &self,
        actor: &Actor,
        id: FavoriteId,
        request: UpdateFavoriteRequest,
    ) -> HavenResult<Favorite> {
        request.validate_request()?;

        let mut favorite = self.owned(actor, id).await?;
        favorite.annotate(request.notes, request.tags);
        let updated = self.favorite_repository.update(&favorite).await?;

        self.cache.invalidate_user_favorites(actor.user_id).await;
        Ok(updated)
    }

    async fn list_favorites(&self, actor: &Actor, page: PageRequest) -> HavenResult<FavoritePage> {
        if let CacheLookup::Hit(cached) = self.cache.get_cached_user_favorites(actor.user_id, page).await {
            return Ok(cached);
        }

        let results = FavoritePage::from(self.favorite_repository.find_by_user(actor.user_id, page).await?);
        self.cache
            .cache_user_favorites(actor.user_id, page, &results)
            .await;
        Ok(results)
    }

    async fn check_favorite_status(&self, actor: &Actor, property_id: PropertyId) -> HavenResult<FavoriteStatus> {
        if let CacheLookup::Hit(status) = self
            .cache
            .get_cached_favorite_status(actor.user_id, property_id)
            .await
        {
            return Ok(status);
        }

        let status = self
            .favorite_repository
            .find_by_user_and_property(actor.user_id, property_id)
            .await?
            .map_or_else(FavoriteStatus::not_favorited, |f| FavoriteStatus::favorited(f.id));

        self.cache
            .cache_favorite_status(actor.user_id, property_id, &status)
            .await;
        Ok(status)
    }
}

impl std::fmt::Debug for FavoriteServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#impl::test_support::Fixture;
    use haven_core::{ListingStatus, UserId, UserRole};

    fn service(fx: &Fixture) -> FavoriteServiceComponent {
        FavoriteServiceComponent::new(fx.db.clone(), fx.db.clone(), fx.cache.clone())
    }

    fn add(property_id: PropertyId) -> AddFavoriteRequest {
        AddFavoriteRequest {
            property_id,
            notes: Some("viewing on Saturday".to_string()),
            tags: vec!["shortlist".to_string()],
        }
    }

    #[tokio::test]
    async fn test_add_rejects_missing_closed_and_duplicate() {
        let fx = Fixture::new();
        let actor = Actor::new(UserId::new(), UserRole::User);
        let favorites = service(&fx);

        let err = favorites.add_favorite(&actor, add(PropertyId::new())).await.unwrap_err();
        assert!(matches!(err, HavenError::NotFound { .. }));

        let mut sold = fx.listing(UserId::new(), "Sold flat", 100.0);
        sold.status = ListingStatus::Sold;
        fx.db.insert_property(sold.clone());
        let err = favorites.add_favorite(&actor, add(sold.id)).await.unwrap_err();
        assert!(matches!(err, HavenError::BusinessRule(_)));

        let listing = fx.listing(UserId::new(), "Open flat", 100.0);
        favorites.add_favorite(&actor, add(listing.id)).await.unwrap();
        let err = favorites.add_favorite(&actor, add(listing.id)).await.unwrap_err();
        assert!(matches!(err, HavenError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_negative_status_is_cached() {
        let fx = Fixture::new();
        let actor = Actor::new(UserId::new(), UserRole::User);
        let listing = fx.listing(UserId::new(), "Open flat", 100.0);
        let favorites = service(&fx);

        let status = favorites.check_favorite_status(&actor, listing.id).await.unwrap();
        assert_eq!(status, FavoriteStatus::not_favorited());
        fx.db.reset_reads();

        favorites.check_favorite_status(&actor, listing.id).await.unwrap();
        assert_eq!(fx.db.reads(), 0);
    }

    #[tokio::test]
    async fn test_list_favorites_reads_through() {
        let fx = Fixture::new();
        let actor = Actor::new(UserId::new(), UserRole::User);
        let listing = fx.listing(UserId::new(), "Open flat", 100.0);
        let favorites = service(&fx);
        favorites.add_favorite(&actor, add(listing.id)).await.unwrap();
        fx.db.reset_reads();

        let first = favorites.list_favorites(&actor, PageRequest::first()).await.unwrap();
        let second = favorites.list_favorites(&actor, PageRequest::first()).await.unwrap();

        assert_eq!(fx.db.reads(), 1);
        assert_eq!(first, second);
        assert_eq!(second.items[0].property, listing);
        assert_eq!(second.items[0].favorite.tags, vec!["shortlist".to_string()]);
    }

    #[tokio::test]
    async fn test_only_owner_can_update_or_remove() {
        let fx = Fixture::new();
        let owner = Actor::new(UserId::new(), UserRole::User);
        let other = Actor::new(UserId::new(), UserRole::Admin);
        let listing = fx.listing(UserId::new(), "Open flat", 100.0);
        let favorites = service(&fx);
        let favorite = favorites.add_favorite(&owner, add(listing.id)).await.unwrap();

        let err = favorites
            .update_favorite(&other, favorite.id, UpdateFavoriteRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HavenError::Forbidden(_)));
        let err = favorites.remove_favorite(&other, favorite.id).await.unwrap_err();
        assert!(matches!(err, HavenError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_drops_cached_lists_but_keeps_status() {
        let fx = Fixture::new();
        let actor = Actor::new(UserId::new(), UserRole::User);
        let listing = fx.listing(UserId::new(), "Open flat", 100.0);
        let favorites = service(&fx);
        let favorite = favorites.add_favorite(&actor, add(listing.id)).await.unwrap();

        favorites.list_favorites(&actor, PageRequest::first()).await.unwrap();
        assert_eq!(fx.store.keys("user:favorites:*").len(), 1);

        let updated = favorites
            .update_favorite(
                &actor,
                favorite.id,
                UpdateFavoriteRequest {
                    notes: None,
                    tags: Some(vec!["top".to_string()]),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.tags, vec!["top".to_string()]);
        assert_eq!(updated.notes.as_deref(), Some("viewing on Saturday"));

        assert!(fx.store.keys("user:favorites:*").is_empty());
        assert_eq!(
            fx.cache.get_cached_favorite_status(actor.user_id, listing.id).await,
            CacheLookup::Hit(FavoriteStatus::favorited(favorite.id))
        );
    }

    #[tokio::test]
    async fn test_remove_writes_negative_status() {
        let fx = Fixture::new();
        let actor = Actor::new(UserId::new(), UserRole::User);
        let listing = fx.listing(UserId::new(), "Open flat", 100.0);
        let favorites = service(&fx);
        let favorite = favorites.add_favorite(&actor, add(listing.id)).await.unwrap();

        favorites.remove_favorite(&actor, favorite.id).await.unwrap();
        fx.db.reset_reads();

        let status = favorites.check_favorite_status(&actor, listing.id).await.unwrap();
        assert_eq!(status, FavoriteStatus::not_favorited());
        assert_eq!(fx.db.reads(), 0);
    }
}
