//! Property DTOs: create/update bodies, the search query and result pages.

use haven_core::rules::{not_blank, positive_price};
use haven_core::{
    ListingStatus, ListingType, Page, PageInfo, PageRequest, Property, PropertyId, PropertyType,
    UserId,
};
use haven_repository::{PropertyFilter, PropertySortField};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request to publish a new listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    #[validate(length(min = 3, max = 200), custom(function = "not_blank"))]
    pub title: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    pub property_type: PropertyType,

    pub listing_type: ListingType,

    /// Defaults to `available`
    pub status: Option<ListingStatus>,

    #[validate(custom(function = "positive_price", message = "Price must be positive"))]
    pub price: f64,

    #[validate(length(min = 1, max = 255))]
    pub address: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    #[validate(length(min = 2, max = 100))]
    pub country: String,

    #[validate(length(max = 20))]
    pub postal_code: Option<String>,

    #[validate(range(max = 100))]
    pub bedrooms: Option<u32>,

    #[validate(range(max = 100))]
    pub bathrooms: Option<u32>,

    #[validate(range(min = 0.0))]
    pub area_sqft: Option<f64>,

    #[validate(length(max = 50))]
    #[serde(default)]
    pub features: Vec<String>,

    #[validate(length(max = 30))]
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreatePropertyRequest {
    /// Builds the listing owned by `owner_id`.
    #[must_use]
    pub fn into_property(self, owner_id: UserId) -> Property {
        let now = chrono::Utc::now();
        Property {
            id: PropertyId::new(),
            owner_id,
            title: self.title.trim().to_string(),
            description: self.description,
            property_type: self.property_type,
            listing_type: self.listing_type,
            status: self.status.unwrap_or_default(),
            price: self.price,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area_sqft: self.area_sqft,
            features: self.features,
            images: self.images,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a listing. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 3, max = 200), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub status: Option<ListingStatus>,
    #[validate(custom(function = "positive_price", message = "Price must be positive"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(range(max = 100))]
    pub bedrooms: Option<u32>,
    #[validate(range(max = 100))]
    pub bathrooms: Option<u32>,
    #[validate(range(min = 0.0))]
    pub area_sqft: Option<f64>,
    #[validate(length(max = 50))]
    pub features: Option<Vec<String>>,
    #[validate(length(max = 30))]
    pub images: Option<Vec<String>>,
}

impl UpdatePropertyRequest {
    /// Applies the present fields to `property` and bumps its timestamp.
    pub fn apply_to(self, property: &mut Property) {
        macro_rules! assign {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = self.$field {
                    property.$field = value;
                })+
            };
        }
        assign!(
            description, property_type, listing_type, status, price, address, city, state,
            country, features, images,
        );
        if let Some(title) = self.title {
            property.title = title.trim().to_string();
        }
        if self.postal_code.is_some() {
            property.postal_code = self.postal_code;
        }
        if self.bedrooms.is_some() {
            property.bedrooms = self.bedrooms;
        }
        if self.bathrooms.is_some() {
            property.bathrooms = self.bathrooms;
        }
        if self.area_sqft.is_some() {
            property.area_sqft = self.area_sqft;
        }
        property.touch();
    }
}

/// Column a search is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    CreatedAt,
    Price,
    Bedrooms,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Property search parameters, taken from the query string.
///
/// The search cache key is fingerprinted from the serialized form of
/// [`PropertySearchQuery::normalized`], so absent parameters must serialize
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PropertySearchQuery {
    /// Free text matched against title and description
    #[validate(length(max = 200))]
    pub q: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub status: Option<ListingStatus>,
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    /// Minimum number of bedrooms
    pub bedrooms: Option<u32>,
    /// Minimum number of bathrooms
    pub bathrooms: Option<u32>,
    pub sort_by: Option<SearchSort>,
    pub sort_order: Option<SortOrder>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl PropertySearchQuery {
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_options(self.page, self.limit)
    }

    /// The query with defaults resolved and blank text dropped.
    ///
    /// Two queries that run the same repository search normalize to the
    /// same value.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let page = self.page_request();
        Self {
            q: self.q.as_ref().map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            sort_by: Some(self.sort_by.unwrap_or(SearchSort::CreatedAt)),
            sort_order: Some(self.sort_order.unwrap_or(SortOrder::Desc)),
            page: Some(page.page),
            limit: Some(page.limit),
            ..self.clone()
        }
    }

    /// Translates the query into a repository filter.
    #[must_use]
    pub fn to_filter(&self) -> PropertyFilter {
        PropertyFilter {
            text: self.q.as_ref().map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            property_type: self.property_type,
            listing_type: self.listing_type,
            status: self.status,
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.bedrooms,
            min_bathrooms: self.bathrooms,
            sort_by: match self.sort_by {
                None | Some(SearchSort::CreatedAt) => PropertySortField::CreatedAt,
                Some(SearchSort::Price) => PropertySortField::Price,
                Some(SearchSort::Bedrooms) => PropertySortField::Bedrooms,
                Some(SearchSort::Area) => PropertySortField::Area,
            },
            descending: !matches!(self.sort_order, Some(SortOrder::Asc)),
        }
    }
}

/// A page of listings, as cached for searches and per-owner lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub pagination: PageInfo,
}

impl From<Page<Property>> for PropertyPage {
    fn from(page: Page<Property>) -> Self {
        Self {
            items: page.items,
            pagination: page.pagination,
        }
    }
}
