//! MySQL property repository implementation.

use crate::traits::{PropertyFilter, PropertyRepository};
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haven_core::{HavenError, HavenResult, Page, PageRequest, Property, PropertyId, UserId};
use shaku::Component;
use sqlx::types::Json;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

pub(crate) const PROPERTY_COLUMNS: &str = "id, owner_id, title, description, property_type, \
     listing_type, status, price, address, city, state, country, postal_code, bedrooms, \
     bathrooms, area_sqft, features, images, created_at, updated_at";

#[derive(Component, Clone)]
#[shaku(interface = PropertyRepository)]
pub struct MySqlPropertyRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlPropertyRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        filter: &PropertyFilter,
        owner: Option<UserId>,
        page: PageRequest,
    ) -> HavenResult<Page<Property>> {
        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM properties");
        push_filters(&mut count, filter, owner);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool.inner()).await?;

        let mut select = QueryBuilder::<MySql>::new(format!("SELECT {PROPERTY_COLUMNS} FROM properties"));
        push_filters(&mut select, filter, owner);
        select
            .push(" ORDER BY ")
            .push(filter.sort_by.column())
            .push(if filter.descending { " DESC" } else { " ASC" })
            .push(", id ASC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows: Vec<PropertyRow> = select.build_query_as().fetch_all(self.pool.inner()).await?;
        let items = rows
            .into_iter()
            .map(Property::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, u64::try_from(total).unwrap_or_default()))
    }
}

/// Appends the `WHERE` clause for `filter` (and optional owner) to `builder`.
fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &PropertyFilter, owner: Option<UserId>) {
    builder.push(" WHERE 1 = 1");

    if let Some(owner) = owner {
        builder.push(" AND owner_id = ").push_bind(owner.to_string());
    }
    if let Some(text) = &filter.text {
        let pattern = format!("%{text}%");
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(city) = &filter.city {
        builder.push(" AND city = ").push_bind(city.clone());
    }
    if let Some(state) = &filter.state {
        builder.push(" AND state = ").push_bind(state.clone());
    }
    if let Some(country) = &filter.country {
        builder.push(" AND country = ").push_bind(country.clone());
    }
    if let Some(property_type) = filter.property_type {
        builder.push(" AND property_type = ").push_bind(property_type.as_str());
    }
    if let Some(listing_type) = filter.listing_type {
        builder.push(" AND listing_type = ").push_bind(listing_type.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(min_bedrooms) = filter.min_bedrooms {
        builder.push(" AND bedrooms >= ").push_bind(min_bedrooms);
    }
    if let Some(min_bathrooms) = filter.min_bathrooms {
        builder.push(" AND bathrooms >= ").push_bind(min_bathrooms);
    }
}

/// Database row representation of a property.
#[derive(Debug, FromRow)]
pub(crate) struct PropertyRow {
    id: String,
    owner_id: String,
    title: String,
    description: String,
    property_type: String,
    listing_type: String,
    status: String,
    price: f64,
    address: String,
    city: String,
    state: String,
    country: String,
    postal_code: Option<String>,
    bedrooms: Option<u32>,
    bathrooms: Option<u32>,
    area_sqft: Option<f64>,
    features: Json<Vec<String>>,
    images: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = HavenError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let corrupt = |e: String| HavenError::Internal(format!("Invalid property row: {e}"));

        Ok(Property {
            id: PropertyId::parse(&row.id).map_err(|e| corrupt(e.to_string()))?,
            owner_id: UserId::parse(&row.owner_id).map_err(|e| corrupt(e.to_string()))?,
            title: row.title,
            description: row.description,
            property_type: row.property_type.parse().map_err(corrupt)?,
            listing_type: row.listing_type.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            price: row.price,
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            postal_code: row.postal_code,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            area_sqft: row.area_sqft,
            features: row.features.0,
            images: row.images.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PropertyRepository for MySqlPropertyRepository {
    async fn find_by_id(&self, id: PropertyId) -> HavenResult<Option<Property>> {
        debug!("Finding property by id: {}", id);

        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Property::try_from).transpose()
    }

    async fn search(&self, filter: &PropertyFilter, page: PageRequest) -> HavenResult<Page<Property>> {
        debug!(?filter, page = page.page, limit = page.limit, "Searching properties");
        self.fetch_page(filter, None, page).await
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> HavenResult<Page<Property>> {
        debug!("Listing properties of owner {}", owner_id);
        let newest_first = PropertyFilter {
            descending: true,
            ..PropertyFilter::default()
        };
        self.fetch_page(&newest_first, Some(owner_id), page).await
    }

    async fn save(&self, property: &Property) -> HavenResult<Property> {
        debug!("Saving new property: {}", property.title);

        sqlx::query(
            r"
            INSERT INTO properties (id, owner_id, title, description, property_type, listing_type,
                                    status, price, address, city, state, country, postal_code,
                                    bedrooms, bathrooms, area_sqft, features, images,
                                    created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(property.id.to_string())
        .bind(property.owner_id.to_string())
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.property_type.as_str())
        .bind(property.listing_type.as_str())
        .bind(property.status.as_str())
        .bind(property.price)
        .bind(&property.address)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.country)
        .bind(&property.postal_code)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area_sqft)
        .bind(Json(&property.features))
        .bind(Json(&property.images))
        .bind(property.created_at)
        .bind(property.updated_at)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(property.id)
            .await?
            .ok_or_else(|| HavenError::Internal("Failed to fetch inserted property".to_string()))
    }

    async fn update(&self, property: &Property) -> HavenResult<Property> {
        debug!("Updating property: {}", property.id);

        sqlx::query(
            r"
            UPDATE properties
            SET title = ?, description = ?, property_type = ?, listing_type = ?, status = ?,
                price = ?, address = ?, city = ?, state = ?, country = ?, postal_code = ?,
                bedrooms = ?, bathrooms = ?, area_sqft = ?, features = ?, images = ?,
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.property_type.as_str())
        .bind(property.listing_type.as_str())
        .bind(property.status.as_str())
        .bind(property.price)
        .bind(&property.address)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.country)
        .bind(&property.postal_code)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area_sqft)
        .bind(Json(&property.features))
        .bind(Json(&property.images))
        .bind(property.updated_at)
        .bind(property.id.to_string())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(property.id)
            .await?
            .ok_or_else(|| HavenError::not_found("Property", property.id))
    }

    async fn delete(&self, id: PropertyId) -> HavenResult<bool> {
        debug!("Deleting property: {}", id);

        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlPropertyRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlPropertyRepository").finish_non_exhaustive()
    }
}
