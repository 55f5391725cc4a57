//! User profile controller.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Router,
};
use haven_core::UserId;
use haven_service::{ChangePasswordRequest, UpdateProfileRequest, UserProfile};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_my_profile).put(update_my_profile).delete(delete_my_account))
        .route("/me/password", put(change_password))
        .route("/:id", get(get_user))
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The caller's profile", body = UserProfile))
)]
pub async fn get_my_profile(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<UserProfile> {
    ok(state.user_service.get_profile(user.user_id).await?)
}

#[utoipa::path(
    put,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn update_my_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserProfile> {
    debug!("Update profile request: {}", user.user_id);
    ok(state.user_service.update_profile(&user, request).await?)
}

#[utoipa::path(
    put,
    path = "/users/me/password",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    state.user_service.change_password(&user, request).await?;
    Ok(no_content())
}

#[utoipa::path(
    delete,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses((status = 204, description = "Account deleted"))
)]
pub async fn delete_my_account(State(state): State<AppState>, user: AuthenticatedUser) -> Result<StatusCode, AppError> {
    debug!("Delete account request: {}", user.user_id);
    state.user_service.delete_account(&user).await?;
    Ok(no_content())
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's profile", body = UserProfile),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<UserProfile> {
    let user_id: UserId = parse_id("user", &id)?;
    ok(state.user_service.get_profile(user_id).await?)
}
