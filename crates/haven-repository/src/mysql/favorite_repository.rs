//! MySQL favorite repository implementation.

use super::property_repository::{PropertyRow, PROPERTY_COLUMNS};
use crate::{traits::FavoriteRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haven_core::{
    Favorite, FavoriteId, FavoriteWithProperty, HavenError, HavenResult, Page, PageRequest, Property,
    PropertyId, UserId,
};
use shaku::Component;
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const FAVORITE_COLUMNS: &str = "id, user_id, property_id, notes, tags, created_at, updated_at";

#[derive(Component, Clone)]
#[shaku(interface = FavoriteRepository)]
pub struct MySqlFavoriteRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlFavoriteRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FavoriteRow {
    id: String,
    user_id: String,
    property_id: String,
    notes: Option<String>,
    tags: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = HavenError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let corrupt = |e: uuid::Error| HavenError::Internal(format!("Invalid favorite row: {e}"));

        Ok(Favorite {
            id: FavoriteId::parse(&row.id).map_err(corrupt)?,
            user_id: UserId::parse(&row.user_id).map_err(corrupt)?,
            property_id: PropertyId::parse(&row.property_id).map_err(corrupt)?,
            notes: row.notes,
            tags: row.tags.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A favorite row joined with its property; favorite columns carry a `fav_` prefix.
#[derive(Debug, FromRow)]
struct FavoriteJoinRow {
    fav_id: String,
    fav_user_id: String,
    fav_property_id: String,
    fav_notes: Option<String>,
    fav_tags: Json<Vec<String>>,
    fav_created_at: DateTime<Utc>,
    fav_updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    property: PropertyRow,
}

impl TryFrom<FavoriteJoinRow> for FavoriteWithProperty {
    type Error = HavenError;

    fn try_from(row: FavoriteJoinRow) -> Result<Self, Self::Error> {
        let favorite = Favorite::try_from(FavoriteRow {
            id: row.fav_id,
            user_id: row.fav_user_id,
            property_id: row.fav_property_id,
            notes: row.fav_notes,
            tags: row.fav_tags,
            created_at: row.fav_created_at,
            updated_at: row.fav_updated_at,
        })?;
        Ok(FavoriteWithProperty {
            favorite,
            property: Property::try_from(row.property)?,
        })
    }
}

fn joined_select() -> String {
    let property_columns = PROPERTY_COLUMNS
        .split(',')
        .map(|column| format!("p.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT f.id AS fav_id, f.user_id AS fav_user_id, f.property_id AS fav_property_id, \
         f.notes AS fav_notes, f.tags AS fav_tags, f.created_at AS fav_created_at, \
         f.updated_at AS fav_updated_at, {property_columns} \
         FROM favorites f INNER JOIN properties p ON p.id = f.property_id"
    )
}

#[async_trait]
impl FavoriteRepository for MySqlFavoriteRepository {
    async fn find_by_id(&self, id: FavoriteId) -> HavenResult<Option<Favorite>> {
        let row = sqlx::query_as::<_, FavoriteRow>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Favorite::try_from).transpose()
    }

    async fn find_by_user_and_property(
        &self,
        user_id: UserId,
        property_id: PropertyId,
    ) -> HavenResult<Option<Favorite>> {
        debug!("Finding favorite of user {} for property {}", user_id, property_id);

        let row = sqlx::query_as::<_, FavoriteRow>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = ? AND property_id = ?"
        ))
        .bind(user_id.to_string())
        .bind(property_id.to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Favorite::try_from).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> HavenResult<Page<FavoriteWithProperty>> {
        debug!("Listing favorites of user {}, page {}", user_id, page.page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, FavoriteJoinRow>(&format!(
            "{} WHERE f.user_id = ? ORDER BY f.created_at DESC, f.id ASC LIMIT ? OFFSET ?",
            joined_select()
        ))
        .bind(user_id.to_string())
        .bind(i64::from(page.limit))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(self.pool.inner())
        .await?;

        let items = rows
            .into_iter()
            .map(FavoriteWithProperty::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, u64::try_from(total).unwrap_or_default()))
    }

    async fn save(&self, favorite: &Favorite) -> HavenResult<Favorite> {
        debug!("Saving favorite {} for user {}", favorite.id, favorite.user_id);

        sqlx::query(
            r"
            INSERT INTO favorites (id, user_id, property_id, notes, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(favorite.id.to_string())
        .bind(favorite.user_id.to_string())
        .bind(favorite.property_id.to_string())
        .bind(&favorite.notes)
        .bind(Json(&favorite.tags))
        .bind(favorite.created_at)
        .bind(favorite.updated_at)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(favorite.id)
            .await?
            .ok_or_else(|| HavenError::Internal("Failed to fetch inserted favorite".to_string()))
    }

    async fn update(&self, favorite: &Favorite) -> HavenResult<Favorite> {
        sqlx::query("UPDATE favorites SET notes = ?, tags = ?, updated_at = ? WHERE id = ?")
            .bind(&favorite.notes)
            .bind(Json(&favorite.tags))
            .bind(favorite.updated_at)
            .bind(favorite.id.to_string())
            .execute(self.pool.inner())
            .await?;

        self.find_by_id(favorite.id)
            .await?
            .ok_or_else(|| HavenError::not_found("Favorite", favorite.id))
    }

    async fn delete(&self, id: FavoriteId) -> HavenResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlFavoriteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlFavoriteRepository").finish_non_exhaustive()
    }
}
