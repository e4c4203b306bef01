//! Store-level tests shared by every backend

use std::sync::Arc;

use serde_json::json;
use surplus_storage::{seal, upgrade, FileStore, KeyValueStore, MemoryStore, StorageKey};
use tempfile::TempDir;

async fn backends() -> (Vec<(&'static str, Arc<dyn KeyValueStore>)>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let file_store = FileStore::open(temp_dir.path().join("store")).await.unwrap();
    let stores: Vec<(&'static str, Arc<dyn KeyValueStore>)> = vec![
        ("file", Arc::new(file_store)),
        ("memory", Arc::new(MemoryStore::new())),
    ];
    (stores, temp_dir)
}

#[tokio::test]
async fn test_round_trip_is_deeply_equal() {
    let (stores, _temp_dir) = backends().await;
    let document = json!({
        "dietaryPreferences": ["vegan", "halal"],
        "maxDistance": 5.0,
        "favoriteRestaurants": ["r1"],
        "userName": "Utilizador",
        "profilePhotoUri": null,
    });

    for (name, store) in stores {
        store
            .save(StorageKey::Preferences, seal(document.clone()))
            .await
            .unwrap();
        let loaded = store.load(StorageKey::Preferences).await.unwrap().unwrap();
        assert_eq!(upgrade(loaded).unwrap(), document, "backend {name}");
    }
}

#[tokio::test]
async fn test_keys_are_independent() {
    let (stores, _temp_dir) = backends().await;

    for (name, store) in stores {
        store
            .save(StorageKey::Impact, json!({"mealsSaved": 4}))
            .await
            .unwrap();

        assert!(
            store.load(StorageKey::Preferences).await.unwrap().is_none(),
            "backend {name}"
        );
        assert_eq!(
            store.load(StorageKey::Impact).await.unwrap(),
            Some(json!({"mealsSaved": 4})),
            "backend {name}"
        );
    }
}

#[tokio::test]
async fn test_save_replaces_whole_document() {
    let (stores, _temp_dir) = backends().await;

    for (name, store) in stores {
        store
            .save(StorageKey::Impact, json!({"mealsSaved": 1, "mealsDonated": 1}))
            .await
            .unwrap();
        store
            .save(StorageKey::Impact, json!({"mealsSaved": 2}))
            .await
            .unwrap();

        assert_eq!(
            store.load(StorageKey::Impact).await.unwrap(),
            Some(json!({"mealsSaved": 2})),
            "backend {name}"
        );
    }
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = FileStore::open(temp_dir.path()).await.unwrap();
        store
            .save(StorageKey::Preferences, seal(json!({"userName": "Rita"})))
            .await
            .unwrap();
    }

    let reopened = FileStore::open(temp_dir.path()).await.unwrap();
    let loaded = reopened.load(StorageKey::Preferences).await.unwrap().unwrap();
    assert_eq!(upgrade(loaded).unwrap(), json!({"userName": "Rita"}));
}

#[tokio::test]
async fn test_accumulated_floats_survive_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(temp_dir.path()).await.unwrap();

    let mut money = 0.0_f64;
    for step in 0..400 {
        money += 0.1 + f64::from(step % 7) * 0.13;
        let document = json!({ "moneySaved": money, "co2Saved": 0.1 + 0.2 });
        store.save(StorageKey::Impact, seal(document.clone())).await.unwrap();

        let loaded = store.load(StorageKey::Impact).await.unwrap().unwrap();
        let data = upgrade(loaded).unwrap();
        assert_eq!(data, document, "step {step}");
        assert_eq!(data["moneySaved"].as_f64(), Some(money));
    }
}
