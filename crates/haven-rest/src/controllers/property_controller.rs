//! Property listing controller.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use haven_core::{HavenError, Property, PropertyId};
use haven_service::{
    CreatePropertyRequest, ListQuery, PropertyPage, PropertySearchQuery, UpdatePropertyRequest,
};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_properties).post(create_property))
        .route("/mine", get(list_my_properties))
        .route(
            "/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
}

/// Searches listings; identical filters share one cached result page.
#[utoipa::path(
    get,
    path = "/properties",
    tag = "properties",
    params(PropertySearchQuery),
    responses(
        (status = 200, description = "Matching listings", body = PropertyPage),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn search_properties(
    State(state): State<AppState>,
    query: Result<Query<PropertySearchQuery>, QueryRejection>,
) -> ApiResult<PropertyPage> {
    let Query(query) = query.map_err(|e| AppError(HavenError::validation(e.body_text())))?;
    ok(state.property_service.search_properties(query).await?)
}

#[utoipa::path(
    post,
    path = "/properties",
    tag = "properties",
    security(("bearer_auth" = [])),
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Listing published", body = Property),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Property>>), AppError> {
    debug!("Create property request by {}", user.user_id);
    let property = state.property_service.create_property(&user, request).await?;
    Ok(created(property))
}

#[utoipa::path(
    get,
    path = "/properties/mine",
    tag = "properties",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses((status = 200, description = "The caller's listings", body = PropertyPage))
)]
pub async fn list_my_properties(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(page): Query<ListQuery>,
) -> ApiResult<PropertyPage> {
    ok(state
        .property_service
        .list_user_properties(user.user_id, page.page_request())
        .await?)
}

#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "The listing", body = Property),
        (status = 404, description = "No such listing")
    )
)]
pub async fn get_property(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Property> {
    let id: PropertyId = parse_id("property", &id)?;
    ok(state.property_service.get_property(id).await?)
}

#[utoipa::path(
    put,
    path = "/properties/{id}",
    tag = "properties",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Property id")),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Listing updated", body = Property),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such listing")
    )
)]
pub async fn update_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePropertyRequest>,
) -> ApiResult<Property> {
    let id: PropertyId = parse_id("property", &id)?;
    debug!("Update property request: {} by {}", id, user.user_id);
    ok(state.property_service.update_property(&user, id, request).await?)
}

#[utoipa::path(
    delete,
    path = "/properties/{id}",
    tag = "properties",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 204, description = "Listing removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such listing")
    )
)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: PropertyId = parse_id("property", &id)?;
    state.property_service.delete_property(&user, id).await?;
    Ok(no_content())
}
