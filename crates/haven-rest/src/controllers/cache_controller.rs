//! Cache administration controller (admin only).
//!
//! Unlike the domain routes, these answer 503 when the cache store is
//! unreachable.

use crate::{
    extractors::AdminUser,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Router,
};
use haven_service::{CacheClearResult, PingResponse, StoreStats};
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(clear_all))
        .route("/stats", get(stats))
        .route("/ping", get(ping))
        .route("/search", delete(clear_search))
        .route("/scope/:id", delete(clear_scope))
}

#[utoipa::path(
    get,
    path = "/cache/stats",
    tag = "cache",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store statistics", body = StoreStats),
        (status = 403, description = "Admin role required"),
        (status = 503, description = "Cache store unavailable")
    )
)]
pub async fn stats(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<StoreStats> {
    ok(state.cache_admin_service.stats().await?)
}

#[utoipa::path(
    delete,
    path = "/cache",
    tag = "cache",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every key removed", body = CacheClearResult),
        (status = 503, description = "Cache store unavailable")
    )
)]
pub async fn clear_all(State(state): State<AppState>, AdminUser(admin): AdminUser) -> ApiResult<CacheClearResult> {
    info!("Cache flush requested by {}", admin.user_id);
    ok(state.cache_admin_service.clear_all().await?)
}

/// Removes every key mentioning a user or resource id.
#[utoipa::path(
    delete,
    path = "/cache/scope/{id}",
    tag = "cache",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User or resource id")),
    responses(
        (status = 200, description = "Scoped keys removed", body = CacheClearResult),
        (status = 400, description = "Id contains glob characters"),
        (status = 503, description = "Cache store unavailable")
    )
)]
pub async fn clear_scope(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<CacheClearResult> {
    info!("Cache scope {} cleared by {}", id, admin.user_id);
    ok(state.cache_admin_service.clear_scope(&id).await?)
}

#[utoipa::path(
    delete,
    path = "/cache/search",
    tag = "cache",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Search results removed", body = CacheClearResult),
        (status = 503, description = "Cache store unavailable")
    )
)]
pub async fn clear_search(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<CacheClearResult> {
    ok(state.cache_admin_service.clear_search().await?)
}

#[utoipa::path(
    get,
    path = "/cache/ping",
    tag = "cache",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store answered", body = PingResponse),
        (status = 503, description = "Cache store unavailable")
    )
)]
pub async fn ping(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<PingResponse> {
    ok(state.cache_admin_service.ping().await?)
}
