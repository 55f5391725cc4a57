//! Property listing entity.

use crate::domain::value_objects::{ListingStatus, ListingType, PropertyType};
use crate::{Entity, PropertyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A property listed on the marketplace by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub status: ListingStatus,
    pub price: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area_sqft: Option<f64>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity<PropertyId> for Property {
    fn id(&self) -> &PropertyId {
        &self.id
    }
}
