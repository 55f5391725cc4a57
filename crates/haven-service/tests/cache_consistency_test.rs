//! End-to-end cache consistency scenarios over the service layer.

mod common;

use common::Marketplace;
use haven_core::{PageRequest, UserId};
use haven_service::{
    keys, AddFavoriteRequest, CacheLookup, CacheTtls, FavoriteService, FavoriteStatus,
    PropertySearchQuery, PropertyService, UpdatePropertyRequest,
};
use std::time::Duration;

#[tokio::test]
async fn test_price_update_invalidates_every_dependent_entry() {
    let market = Marketplace::new();
    let owner = market.member("olive");
    let listing = market.listing(owner.user_id, "Harbour view flat", 300_000.0);

    market.properties.get_property(listing.id).await.unwrap();
    market
        .properties
        .search_properties(PropertySearchQuery::default())
        .await
        .unwrap();
    market
        .properties
        .list_user_properties(owner.user_id, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(market.store.keys("search:properties:*").len(), 1);
    assert_eq!(market.store.keys("user:properties:*").len(), 1);

    market
        .properties
        .update_property(
            &owner,
            listing.id,
            UpdatePropertyRequest {
                price: Some(275_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(market.store.keys("search:properties:*").is_empty());
    assert!(market.store.keys(&keys::user_properties_pattern(owner.user_id)).is_empty());

    // The property entry is written through with the new price.
    market.db.reset_reads();
    let fetched = market.properties.get_property(listing.id).await.unwrap();
    assert_eq!(fetched.price, 275_000.0);
    assert_eq!(market.db.reads(), 0);

    let search = market
        .properties
        .search_properties(PropertySearchQuery::default())
        .await
        .unwrap();
    assert_eq!(search.items[0].price, 275_000.0);
    assert_eq!(market.db.reads(), 1);
}

#[tokio::test]
async fn test_favorite_toggle_is_served_from_cache() {
    let market = Marketplace::new();
    let seller = market.member("sam");
    let buyer = market.member("bea");
    let listing = market.listing(seller.user_id, "Garden maisonette", 410_000.0);

    let status = market
        .favorites
        .check_favorite_status(&buyer, listing.id)
        .await
        .unwrap();
    assert_eq!(status, FavoriteStatus::not_favorited());
    assert_eq!(
        market.cache.get_cached_favorite_status(buyer.user_id, listing.id).await,
        CacheLookup::Hit(FavoriteStatus::not_favorited())
    );

    let favorite = market
        .favorites
        .add_favorite(
            &buyer,
            AddFavoriteRequest {
                property_id: listing.id,
                notes: None,
                tags: vec![],
            },
        )
        .await
        .unwrap();

    market.db.reset_reads();
    let status = market
        .favorites
        .check_favorite_status(&buyer, listing.id)
        .await
        .unwrap();
    assert_eq!(status, FavoriteStatus::favorited(favorite.id));
    assert_eq!(market.db.reads(), 0);

    market.favorites.remove_favorite(&buyer, favorite.id).await.unwrap();

    market.db.reset_reads();
    let status = market
        .favorites
        .check_favorite_status(&buyer, listing.id)
        .await
        .unwrap();
    assert!(!status.is_favorited);
    assert_eq!(market.db.reads(), 0);
}

#[tokio::test]
async fn test_entries_expire_after_their_ttl() {
    let market = Marketplace::with_ttls(CacheTtls::uniform(Duration::from_secs(1)));
    let owner = market.member("ivy");
    let listing = market.listing(owner.user_id, "Mews house", 520_000.0);

    market.properties.get_property(listing.id).await.unwrap();
    market.properties.get_property(listing.id).await.unwrap();
    assert_eq!(market.db.reads(), 1);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(market.cache.get_cached_property(listing.id).await, CacheLookup::Miss);
    market.properties.get_property(listing.id).await.unwrap();
    assert_eq!(market.db.reads(), 2);
}

#[tokio::test]
async fn test_pages_are_cached_independently() {
    let market = Marketplace::new();
    let owner = market.member("noor");
    for (title, price) in [("Attic studio", 150_000.0), ("Dock loft", 210_000.0), ("Mill flat", 260_000.0)] {
        market.listing(owner.user_id, title, price);
    }

    let first = market
        .properties
        .list_user_properties(owner.user_id, PageRequest::new(1, 2))
        .await
        .unwrap();
    let second = market
        .properties
        .list_user_properties(owner.user_id, PageRequest::new(2, 2))
        .await
        .unwrap();

    assert_eq!(first.items.len(), 2);
    assert_eq!(second.items.len(), 1);
    assert!(!first.items.iter().any(|p| p.id == second.items[0].id));
    assert_eq!(
        market.store.keys(&keys::user_properties_pattern(owner.user_id)),
        vec![
            keys::user_properties(owner.user_id, PageRequest::new(1, 2)),
            keys::user_properties(owner.user_id, PageRequest::new(2, 2)),
        ]
    );

    market.db.reset_reads();
    let again = market
        .properties
        .list_user_properties(owner.user_id, PageRequest::new(2, 2))
        .await
        .unwrap();
    assert_eq!(again, second);
    assert_eq!(market.db.reads(), 0);
}

#[tokio::test]
async fn test_unavailable_store_falls_through_to_repository() {
    let market = Marketplace::new();
    let owner = market.member("ada");
    let listing = market.listing(owner.user_id, "Riverside cottage", 330_000.0);
    market.store.set_available(false);

    for _ in 0..2 {
        let property = market.properties.get_property(listing.id).await.unwrap();
        assert_eq!(property.id, listing.id);
    }
    assert_eq!(market.db.reads(), 2);
    assert_eq!(
        market.cache.get_cached_property(listing.id).await,
        CacheLookup::Unavailable
    );

    market.store.set_available(true);
    assert_eq!(market.cache.get_cached_property(listing.id).await, CacheLookup::Miss);
}

#[tokio::test]
async fn test_search_key_ignores_parameter_order() {
    let market = Marketplace::new();
    let owner = market.member("lee");
    market.listing(owner.user_id, "Harbour view flat", 300_000.0);

    let a: PropertySearchQuery =
        serde_json::from_str(r#"{"city":"Bristol","minPrice":100000,"bedrooms":3}"#).unwrap();
    let b: PropertySearchQuery =
        serde_json::from_str(r#"{"bedrooms":3,"minPrice":100000,"city":"Bristol"}"#).unwrap();
    assert_eq!(
        keys::search_properties(&a).unwrap(),
        keys::search_properties(&b).unwrap()
    );

    let first = market.properties.search_properties(a).await.unwrap();
    let second = market.properties.search_properties(b).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.pagination.total, 1);
    assert_eq!(market.db.reads(), 1);
}

#[tokio::test]
async fn test_other_users_lists_survive_an_update() {
    let market = Marketplace::new();
    let owner = market.member("kit");
    let neighbour = market.member("jo");
    let listing = market.listing(owner.user_id, "Corner plot", 90_000.0);
    market.listing(neighbour.user_id, "Terrace", 180_000.0);

    market
        .properties
        .list_user_properties(neighbour.user_id, PageRequest::first())
        .await
        .unwrap();

    market
        .properties
        .update_property(
            &owner,
            listing.id,
            UpdatePropertyRequest {
                title: Some("Corner plot with permission".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        market.store.keys(&keys::user_properties_pattern(neighbour.user_id)).len(),
        1
    );
    assert!(market
        .store
        .keys(&keys::user_properties_pattern(UserId::new()))
        .is_empty());
}

#[tokio::test]
async fn test_price_update_refreshes_other_users_favorites() {
    let market = Marketplace::new();
    let seller = market.member("rae");
    let buyer = market.member("tom");
    let listing = market.listing(seller.user_id, "Quayside duplex", 100_000.0);

    market
        .favorites
        .add_favorite(
            &buyer,
            AddFavoriteRequest {
                property_id: listing.id,
                notes: None,
                tags: vec![],
            },
        )
        .await
        .unwrap();
    let before = market
        .favorites
        .list_favorites(&buyer, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(before.items[0].property.price, 100_000.0);
    assert_eq!(market.store.keys(&keys::user_favorites_pattern(buyer.user_id)).len(), 1);

    market
        .properties
        .update_property(
            &seller,
            listing.id,
            UpdatePropertyRequest {
                price: Some(50_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(market.store.keys(&keys::all_user_favorites()).is_empty());

    let after = market
        .favorites
        .list_favorites(&buyer, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(after.items[0].property.price, 50_000.0);
    assert_eq!(after.items[0].favorite, before.items[0].favorite);
}
