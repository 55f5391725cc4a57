//! Integration tests for the MySQL repositories.
//!
//! These run against a real MySQL server started with testcontainers and
//! need Docker.

mod common;

use common::{test_property, test_user, TestDatabase};
use haven_core::{Favorite, HavenError, ListingType, PageRequest, PropertyId};
use haven_repository::{
    FavoriteRepository, MySqlFavoriteRepository, MySqlPropertyRepository, MySqlUserRepository,
    PropertyFilter, PropertyRepository, PropertySortField, UserRepository,
};

#[tokio::test]
async fn test_user_round_trip_and_soft_delete() {
    let db = TestDatabase::new().await;
    let users = MySqlUserRepository::new(db.pool());

    let user = users.save(&test_user("alice")).await.unwrap();
    assert!(users.exists_by_username("alice").await.unwrap());
    assert!(users.exists_by_email("ALICE@example.com").await.unwrap());

    let found = users
        .find_by_username_or_email("alice@example.com")
        .await
        .unwrap()
        .expect("user should be found by email");
    assert_eq!(found.id, user.id);

    assert!(users.delete(user.id).await.unwrap());
    assert!(users.find_by_id(user.id).await.unwrap().is_none());
    assert!(!users.delete(user.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let db = TestDatabase::new().await;
    let users = MySqlUserRepository::new(db.pool());

    users.save(&test_user("bob")).await.unwrap();
    let mut duplicate = test_user("bob");
    duplicate.email = haven_core::Email::new_unchecked("other@example.com");

    match users.save(&duplicate).await.unwrap_err() {
        HavenError::Conflict(_) => {}
        other => panic!("Expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_property_crud_and_owner_listing() {
    let db = TestDatabase::new().await;
    let users = MySqlUserRepository::new(db.pool());
    let properties = MySqlPropertyRepository::new(db.pool());

    let owner = users.save(&test_user("owner")).await.unwrap();
    let mut property = properties
        .save(&test_property(owner.id, "Sunny bungalow", "Oakland", 650_000.0))
        .await
        .unwrap();
    assert_eq!(property.features, vec!["garage".to_string()]);

    property.price = 600_000.0;
    property.listing_type = ListingType::Rent;
    let updated = properties.update(&property).await.unwrap();
    assert!((updated.price - 600_000.0).abs() < f64::EPSILON);
    assert_eq!(updated.listing_type, ListingType::Rent);

    for i in 0..3 {
        properties
            .save(&test_property(owner.id, &format!("Flat {i}"), "Oakland", 300_000.0))
            .await
            .unwrap();
    }

    let first = properties.find_by_owner(owner.id, PageRequest::new(1, 2)).await.unwrap();
    let second = properties.find_by_owner(owner.id, PageRequest::new(2, 2)).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(first.pagination.total, 4);
    assert!(first.pagination.has_next);
    assert!(!second.pagination.has_next);

    assert!(properties.delete(property.id).await.unwrap());
    assert!(properties.find_by_id(property.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_property_search_filters() {
    let db = TestDatabase::new().await;
    let users = MySqlUserRepository::new(db.pool());
    let properties = MySqlPropertyRepository::new(db.pool());

    let owner = users.save(&test_user("agent")).await.unwrap();
    properties.save(&test_property(owner.id, "Loft downtown", "Austin", 420_000.0)).await.unwrap();
    properties.save(&test_property(owner.id, "Ranch house", "Austin", 780_000.0)).await.unwrap();
    properties.save(&test_property(owner.id, "Beach condo", "Miami", 510_000.0)).await.unwrap();

    let austin = PropertyFilter {
        city: Some("Austin".to_string()),
        sort_by: PropertySortField::Price,
        ..PropertyFilter::default()
    };
    let page = properties.search(&austin, PageRequest::first()).await.unwrap();
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.items[0].title, "Loft downtown");

    let pricey = PropertyFilter {
        min_price: Some(500_000.0),
        text: Some("condo".to_string()),
        ..PropertyFilter::default()
    };
    let page = properties.search(&pricey, PageRequest::first()).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].city, "Miami");
}

#[tokio::test]
async fn test_favorites_unique_and_cascade() {
    let db = TestDatabase::new().await;
    let users = MySqlUserRepository::new(db.pool());
    let properties = MySqlPropertyRepository::new(db.pool());
    let favorites = MySqlFavoriteRepository::new(db.pool());

    let owner = users.save(&test_user("seller")).await.unwrap();
    let buyer = users.save(&test_user("buyer")).await.unwrap();
    let property = properties
        .save(&test_property(owner.id, "Cottage", "Denver", 350_000.0))
        .await
        .unwrap();

    let mut favorite = favorites
        .save(&Favorite::new(buyer.id, property.id, None, vec!["maybe".to_string()]))
        .await
        .unwrap();
    assert!(favorites
        .find_by_user_and_property(buyer.id, property.id)
        .await
        .unwrap()
        .is_some());
    assert!(favorites
        .find_by_user_and_property(buyer.id, PropertyId::new())
        .await
        .unwrap()
        .is_none());

    let duplicate = Favorite::new(buyer.id, property.id, None, vec![]);
    assert!(matches!(favorites.save(&duplicate).await, Err(HavenError::Conflict(_))));

    favorite.annotate(Some("call agent".to_string()), None);
    let favorite = favorites.update(&favorite).await.unwrap();
    assert_eq!(favorite.notes.as_deref(), Some("call agent"));

    let listed = favorites.find_by_user(buyer.id, PageRequest::first()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.items[0].property.title, "Cottage");
    assert_eq!(listed.items[0].favorite.tags, vec!["maybe".to_string()]);

    properties.delete(property.id).await.unwrap();
    assert!(favorites.find_by_id(favorite.id).await.unwrap().is_none());
}
