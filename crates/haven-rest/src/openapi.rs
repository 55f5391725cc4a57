//! OpenAPI document served at `/api-docs/openapi.json` and browsed via Swagger UI.

use crate::controllers::{DependencyStatus, HealthResponse, ReadinessResponse};
use haven_core::{
    ErrorResponse, Favorite, FavoriteWithProperty, FieldError, ListingStatus, ListingType, PageInfo,
    Property, PropertyType, UserRole, UserStatus,
};
use haven_service::{
    AddFavoriteRequest, AuthResponse, CacheClearResult, ChangePasswordRequest,
    CreatePropertyRequest, FavoritePage, FavoriteStatus, LoginRequest, MessageResponse,
    PingResponse, PropertyPage, RefreshTokenRequest, RegisterRequest, SearchSort, SortOrder,
    StoreStats, UpdateFavoriteRequest, UpdateProfileRequest, UpdatePropertyRequest, UserProfile,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Haven Marketplace API",
        version = "1.0.0",
        description = "Property listings, favorites and account management",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "/api/v1", description = "API v1")),
    paths(
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh_token,
        crate::controllers::auth_controller::logout,
        crate::controllers::auth_controller::get_current_user,
        crate::controllers::user_controller::get_my_profile,
        crate::controllers::user_controller::update_my_profile,
        crate::controllers::user_controller::change_password,
        crate::controllers::user_controller::delete_my_account,
        crate::controllers::user_controller::get_user,
        crate::controllers::property_controller::search_properties,
        crate::controllers::property_controller::create_property,
        crate::controllers::property_controller::list_my_properties,
        crate::controllers::property_controller::get_property,
        crate::controllers::property_controller::update_property,
        crate::controllers::property_controller::delete_property,
        crate::controllers::favorite_controller::list_favorites,
        crate::controllers::favorite_controller::add_favorite,
        crate::controllers::favorite_controller::update_favorite,
        crate::controllers::favorite_controller::remove_favorite,
        crate::controllers::favorite_controller::check_favorite_status,
        crate::controllers::cache_controller::stats,
        crate::controllers::cache_controller::clear_all,
        crate::controllers::cache_controller::clear_scope,
        crate::controllers::cache_controller::clear_search,
        crate::controllers::cache_controller::ping,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(schemas(
        UserRole,
        UserStatus,
        PropertyType,
        ListingType,
        ListingStatus,
        Property,
        Favorite,
        FavoriteWithProperty,
        PageInfo,
        ErrorResponse,
        FieldError,
        LoginRequest,
        RegisterRequest,
        RefreshTokenRequest,
        AuthResponse,
        MessageResponse,
        UserProfile,
        UpdateProfileRequest,
        ChangePasswordRequest,
        CreatePropertyRequest,
        UpdatePropertyRequest,
        SearchSort,
        SortOrder,
        PropertyPage,
        AddFavoriteRequest,
        UpdateFavoriteRequest,
        FavoritePage,
        FavoriteStatus,
        StoreStats,
        CacheClearResult,
        PingResponse,
        HealthResponse,
        ReadinessResponse,
        DependencyStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and tokens"),
        (name = "users", description = "Account profile"),
        (name = "properties", description = "Listings and search"),
        (name = "favorites", description = "Saved listings"),
        (name = "cache", description = "Cache administration"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
