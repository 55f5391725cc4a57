//! Property service trait definition.

use crate::dto::{CreatePropertyRequest, PropertyPage, PropertySearchQuery, UpdatePropertyRequest};
use async_trait::async_trait;
use haven_core::{HavenResult, Interface, PageRequest, Property, PropertyId, UserId};
use haven_security::Actor;

/// Listing operations.
///
/// Reads go through the cache. Every mutation drops the property's own
/// entry, every cached search and the owner's cached lists, then writes the
/// fresh listing back.
#[async_trait]
pub trait PropertyService: Interface + Send + Sync {
    async fn create_property(&self, actor: &Actor, request: CreatePropertyRequest) -> HavenResult<Property>;

    async fn get_property(&self, id: PropertyId) -> HavenResult<Property>;

    /// Owner or admin only.
    async fn update_property(
        &self,
        actor: &Actor,
        id: PropertyId,
        request: UpdatePropertyRequest,
    ) -> HavenResult<Property>;

    /// Owner or admin only.
    async fn delete_property(&self, actor: &Actor, id: PropertyId) -> HavenResult<()>;

    async fn search_properties(&self, query: PropertySearchQuery) -> HavenResult<PropertyPage>;

    /// Lists an owner's listings, newest first.
    async fn list_user_properties(&self, owner_id: UserId, page: PageRequest) -> HavenResult<PropertyPage>;
}
