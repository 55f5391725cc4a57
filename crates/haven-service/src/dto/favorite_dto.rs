//! Favorite DTOs.

use haven_core::{FavoriteId, FavoriteWithProperty, Page, PageInfo, PropertyId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub property_id: PropertyId,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    #[validate(length(max = 20))]
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Replaces the notes and/or tags of a favorite.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFavoriteRequest {
    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,
}

/// A page of a user's favorites, each with its listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FavoritePage {
    pub items: Vec<FavoriteWithProperty>,
    pub pagination: PageInfo,
}

impl From<Page<FavoriteWithProperty>> for FavoritePage {
    fn from(page: Page<FavoriteWithProperty>) -> Self {
        Self {
            items: page.items,
            pagination: page.pagination,
        }
    }
}

/// Whether a user has favorited a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorited: bool,
    pub favorite_id: Option<FavoriteId>,
}

impl FavoriteStatus {
    #[must_use]
    pub const fn favorited(favorite_id: FavoriteId) -> Self {
        Self {
            is_favorited: true,
            favorite_id: Some(favorite_id),
        }
    }

    #[must_use]
    pub const fn not_favorited() -> Self {
        Self {
            is_favorited: false,
            favorite_id: None,
        }
    }
}
