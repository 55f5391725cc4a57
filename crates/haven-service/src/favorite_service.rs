//! Favorite service trait definition.

use crate::dto::{AddFavoriteRequest, FavoritePage, FavoriteStatus, UpdateFavoriteRequest};
use async_trait::async_trait;
use haven_core::{Favorite, FavoriteId, HavenResult, Interface, PageRequest, PropertyId};
use haven_security::Actor;

/// Per-user favorites.
#[async_trait]
pub trait FavoriteService: Interface + Send + Sync {
    /// Favorites a property. Fails with a conflict if it already is one.
    async fn add_favorite(&self, actor: &Actor, request: AddFavoriteRequest) -> HavenResult<Favorite>;

    async fn remove_favorite(&self, actor: &Actor, id: FavoriteId) -> HavenResult<()>;

    /// Replaces notes and/or tags.
    async fn update_favorite(
        &self,
        actor: &Actor,
        id: FavoriteId,
        request: UpdateFavoriteRequest,
    ) -> HavenResult<Favorite>;

    async fn list_favorites(&self, actor: &Actor, page: PageRequest) -> HavenResult<FavoritePage>;

    async fn check_favorite_status(&self, actor: &Actor, property_id: PropertyId) -> HavenResult<FavoriteStatus>;
}
