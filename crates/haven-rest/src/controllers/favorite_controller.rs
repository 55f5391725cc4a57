//! Favorites controller. Every route acts on the caller's own favorites.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use haven_core::{Favorite, FavoriteId, PropertyId};
use haven_service::{AddFavoriteRequest, FavoritePage, FavoriteStatus, ListQuery, UpdateFavoriteRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/:id", put(update_favorite).delete(remove_favorite))
        .route("/status/:property_id", get(check_favorite_status))
}

#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses((status = 200, description = "The caller's favorites", body = FavoritePage))
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(page): Query<ListQuery>,
) -> ApiResult<FavoritePage> {
    ok(state.favorite_service.list_favorites(&user, page.page_request()).await?)
}

#[utoipa::path(
    post,
    path = "/favorites",
    tag = "favorites",
    security(("bearer_auth" = [])),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = Favorite),
        (status = 400, description = "Listing is closed"),
        (status = 404, description = "No such listing"),
        (status = 409, description = "Already a favorite")
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Favorite>>), AppError> {
    let favorite = state.favorite_service.add_favorite(&user, request).await?;
    Ok(created(favorite))
}

#[utoipa::path(
    put,
    path = "/favorites/{id}",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Favorite id")),
    request_body = UpdateFavoriteRequest,
    responses(
        (status = 200, description = "Notes and tags updated", body = Favorite),
        (status = 403, description = "Another user's favorite"),
        (status = 404, description = "No such favorite")
    )
)]
pub async fn update_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateFavoriteRequest>,
) -> ApiResult<Favorite> {
    let id: FavoriteId = parse_id("favorite", &id)?;
    ok(state.favorite_service.update_favorite(&user, id, request).await?)
}

#[utoipa::path(
    delete,
    path = "/favorites/{id}",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Favorite id")),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 403, description = "Another user's favorite"),
        (status = 404, description = "No such favorite")
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: FavoriteId = parse_id("favorite", &id)?;
    state.favorite_service.remove_favorite(&user, id).await?;
    Ok(no_content())
}

#[utoipa::path(
    get,
    path = "/favorites/status/{property_id}",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("property_id" = String, Path, description = "Property id")),
    responses((status = 200, description = "Whether the caller favorited the listing", body = FavoriteStatus))
)]
pub async fn check_favorite_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(property_id): Path<String>,
) -> ApiResult<FavoriteStatus> {
    let property_id: PropertyId = parse_id("property", &property_id)?;
    ok(state.favorite_service.check_favorite_status(&user, property_id).await?)
}
