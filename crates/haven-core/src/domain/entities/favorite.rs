//! Favorite entity: a user's bookmark of a property.

use super::Property;
use crate::{Entity, FavoriteId, PropertyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// At most one favorite exists per `(user_id, property_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub property_id: PropertyId,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Favorite {
    #[must_use]
    pub fn new(user_id: UserId, property_id: PropertyId, notes: Option<String>, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FavoriteId::new(),
            user_id,
            property_id,
            notes,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces notes and/or tags when provided.
    pub fn annotate(&mut self, notes: Option<String>, tags: Option<Vec<String>>) {
        if notes.is_some() {
            self.notes = notes;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }
}

/// A favorite joined with the listing it points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FavoriteWithProperty {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub property: Property,
}

impl Entity<FavoriteId> for Favorite {
    fn id(&self) -> &FavoriteId {
        &self.id
    }
}
