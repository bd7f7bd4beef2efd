//! Restart behavior over file-backed persistence: snapshots written by one
//! "process" are hydrated by the next, and damaged blobs degrade to
//! defaults instead of crashing.

#![allow(clippy::unwrap_used)]

use niba_vision_core::ItemId;
use niba_vision_integration_tests::reader_profile;
use niba_vision_store::{CartLine, SessionState, StoreConfig, Stores};

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    {
        let stores = Stores::open(config.clone()).await.unwrap();
        stores.cart().add(ItemId::new(1));
        stores.cart().add(ItemId::new(1));
        stores.cart().add(ItemId::new(2));
        stores.shutdown().await;
    }

    let stores = Stores::open(config).await.unwrap();
    let state = stores.cart().state();
    assert_eq!(state.line(ItemId::new(1)), Some(CartLine { quantity: 2 }));
    assert_eq!(state.line(ItemId::new(2)), Some(CartLine { quantity: 1 }));
    assert_eq!(stores.cart().current_count(), 3);
}

#[tokio::test]
async fn test_session_survives_restart_and_logout_erases_it() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    {
        let stores = Stores::open(config.clone()).await.unwrap();
        stores.session().login(reader_profile());
        stores.shutdown().await;
    }

    {
        let stores = Stores::open(config.clone()).await.unwrap();
        assert_eq!(
            stores.session().current(),
            SessionState::Authenticated(reader_profile())
        );
        stores.session().logout();
        stores.shutdown().await;
    }

    let stores = Stores::open(config).await.unwrap();
    assert_eq!(stores.session().current(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_corrupted_cart_blob_hydrates_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    {
        let stores = Stores::open(config.clone()).await.unwrap();
        stores.cart().add(ItemId::new(1));
        stores.cart().add(ItemId::new(1));
        stores.shutdown().await;
    }

    // Simulate on-disk damage between runs.
    std::fs::write(dir.path().join("cart.json"), b"\xff\xfe garbage").unwrap();

    let stores = Stores::open(config).await.unwrap();
    assert!(stores.cart().state().is_empty());
    assert_eq!(stores.cart().current_count(), 0);
}

#[tokio::test]
async fn test_corrupted_session_blob_hydrates_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    std::fs::write(dir.path().join("session.json"), b"{\"email\": 42}").unwrap();

    let stores = Stores::open(config).await.unwrap();
    assert_eq!(stores.session().current(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_clear_persists_the_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    {
        let stores = Stores::open(config.clone()).await.unwrap();
        stores.cart().add(ItemId::new(5));
        stores.cart().clear();
        stores.shutdown().await;
    }

    let stores = Stores::open(config).await.unwrap();
    assert!(stores.cart().state().is_empty());
}

#[tokio::test]
async fn test_on_disk_cart_schema_is_id_keyed_quantities() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    {
        let stores = Stores::open(config.clone()).await.unwrap();
        stores.cart().add(ItemId::new(7));
        stores.cart().add(ItemId::new(7));
        stores.shutdown().await;
    }

    let bytes = std::fs::read(dir.path().join("cart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, serde_json::json!({ "7": { "quantity": 2 } }));
}
