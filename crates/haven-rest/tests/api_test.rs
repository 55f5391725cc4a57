//! Router tests over in-memory repositories and cache store.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use haven_config::{SecurityConfig, ServerConfig};
use haven_core::UserRole;
use haven_repository::MemoryDatabase;
use haven_rest::{create_router, AppState};
use haven_security::{PasswordHasher, TokenProvider};
use haven_service::{
    AuthServiceComponent, CacheAdminServiceComponent, CacheServiceImpl, CacheTtls,
    FavoriteServiceComponent, MemoryStore, PropertyServiceComponent, StoreHealth,
    UserServiceComponent,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "Secret1Pass";

struct TestApp {
    router: Router,
    db: Arc<MemoryDatabase>,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(CacheServiceImpl::new(store.clone(), CacheTtls::default()));
        let hasher = Arc::new(PasswordHasher::with_cost(1));
        let tokens = Arc::new(TokenProvider::new(Arc::new(SecurityConfig::default())));

        let user_service = Arc::new(UserServiceComponent::new(db.clone(), hasher.clone(), cache.clone()));
        let state = AppState {
            auth_service: Arc::new(AuthServiceComponent::new(
                db.clone(),
                hasher,
                tokens.clone(),
                user_service.clone(),
                cache.clone(),
            )),
            user_service,
            property_service: Arc::new(PropertyServiceComponent::new(db.clone(), cache.clone())),
            favorite_service: Arc::new(FavoriteServiceComponent::new(db.clone(), db.clone(), cache)),
            cache_admin_service: Arc::new(CacheAdminServiceComponent::new(store.clone())),
            health_checks: Vec::new(),
        }
        .with_health_check(Arc::new(StoreHealth::new(store.clone())));

        Self {
            router: create_router(state, tokens, &ServerConfig::default()),
            db,
            store,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Registers an account and returns its access token and id.
    async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["accessToken"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Registers an account, promotes it to admin and logs in again.
    async fn admin(&self, username: &str) -> String {
        let (_, id) = self.register(username).await;
        let mut user = self.db.user(id.parse().unwrap()).unwrap();
        user.role = UserRole::Admin;
        self.db.insert_user(user);

        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"usernameOrEmail": username, "password": PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["accessToken"].as_str().unwrap().to_string()
    }

    async fn publish(&self, token: &str, title: &str, price: f64) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/properties",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": "South facing",
                    "propertyType": "apartment",
                    "listingType": "sale",
                    "price": price,
                    "address": "4 Wharf Road",
                    "city": "Leeds",
                    "state": "West Yorkshire",
                    "country": "UK",
                    "bedrooms": 2
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();
    let (token, id) = app.register("harper").await;

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"usernameOrEmail": "harper", "password": "Wrong1Pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_missing_token_is_rejected_with_envelope() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = app.send(Method::GET, "/api/v1/users/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_body_lists_field_errors() {
    let app = TestApp::new();
    let (token, _) = app.register("rowan").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/properties",
            Some(&token),
            Some(json!({
                "title": "Loft",
                "propertyType": "apartment",
                "listingType": "sale",
                "price": -1.0,
                "address": "4 Wharf Road",
                "city": "Leeds",
                "state": "West Yorkshire",
                "country": "UK"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["field"], "price");

    let (status, body) = app
        .send(Method::POST, "/api/v1/properties", Some(&token), Some(json!({"title": 5})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_listing_lifecycle() {
    let app = TestApp::new();
    let (owner, _) = app.register("quinn").await;
    let (stranger, _) = app.register("reese").await;
    let id = app.publish(&owner, "Wharf apartment", 240_000.0).await;

    let (status, body) = app.send(Method::GET, &format!("/api/v1/properties/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Wharf apartment");

    let (status, body) = app
        .send(Method::GET, "/api/v1/properties?city=Leeds&maxPrice=300000", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/v1/properties/{id}"),
            Some(&stranger),
            Some(json!({"price": 1.0})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/properties/{id}"),
            Some(&owner),
            Some(json!({"price": 225000.0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 225_000.0);

    // The cached search page was invalidated by the update.
    let (_, body) = app
        .send(Method::GET, "/api/v1/properties?city=Leeds&maxPrice=300000", None, None)
        .await;
    assert_eq!(body["data"]["items"][0]["price"], 225_000.0);

    let (status, body) = app.send(Method::GET, "/api/v1/properties/mine", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/properties/{id}"), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::GET, &format!("/api/v1/properties/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_ids_and_filters_are_bad_requests() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/properties/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(Method::GET, "/api/v1/properties?minPrice=cheap", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_flow() {
    let app = TestApp::new();
    let (seller, _) = app.register("sasha").await;
    let (buyer, _) = app.register("blake").await;
    let property_id = app.publish(&seller, "Canal cottage", 199_000.0).await;
    let status_uri = format!("/api/v1/favorites/status/{property_id}");

    let (_, body) = app.send(Method::GET, &status_uri, Some(&buyer), None).await;
    assert_eq!(body["data"]["isFavorited"], false);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/favorites",
            Some(&buyer),
            Some(json!({"propertyId": property_id, "tags": ["shortlist"]})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let favorite_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.send(Method::GET, &status_uri, Some(&buyer), None).await;
    assert_eq!(body["data"]["isFavorited"], true);
    assert_eq!(body["data"]["favoriteId"], favorite_id.as_str());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/favorites",
            Some(&buyer),
            Some(json!({"propertyId": property_id})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = app.send(Method::GET, "/api/v1/favorites", Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/favorites/{favorite_id}"), Some(&seller), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/favorites/{favorite_id}"), Some(&buyer), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.send(Method::GET, &status_uri, Some(&buyer), None).await;
    assert_eq!(body["data"]["isFavorited"], false);
}

#[tokio::test]
async fn test_cache_admin_requires_admin_role() {
    let app = TestApp::new();
    let (member, _) = app.register("morgan").await;
    let (status, body) = app.send(Method::GET, "/api/v1/cache/stats", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let admin = app.admin("avery").await;
    let (status, body) = app.send(Method::GET, "/api/v1/cache/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["connected"], true);

    let (status, body) = app.send(Method::DELETE, "/api/v1/cache/search", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["scope"], "search:properties:*");

    let (status, _) = app.send(Method::DELETE, "/api/v1/cache/scope/*", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.send(Method::DELETE, "/api/v1/cache", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["scope"], "*");
    assert!(body["data"]["keysRemoved"].is_null());
    assert!(app.store.keys("*").is_empty());
}

#[tokio::test]
async fn test_unavailable_store_only_affects_admin_surface() {
    let app = TestApp::new();
    let (seller, _) = app.register("drew").await;
    let admin = app.admin("ellis").await;
    let id = app.publish(&seller, "Dockside flat", 150_000.0).await;
    app.store.set_available(false);

    let (status, _) = app.send(Method::GET, &format!("/api/v1/properties/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, "/api/v1/cache/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");

    let (status, _) = app.send(Method::GET, "/api/v1/cache/ping", Some(&admin), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = app.send(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["cache"]["status"], "degraded");
}

#[tokio::test]
async fn test_health_probes() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["cache"]["status"], "healthy");

    let (status, _) = app.send(Method::GET, "/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
