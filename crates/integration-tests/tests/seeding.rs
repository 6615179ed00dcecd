use std::sync::Arc;

use integration_tests::{FaultyStore, Harness};
use rp_core::{Category, Collection, KeyValueStore, Post, Seeder};
use rp_storage_local::MemoryStore;

#[tokio::test]
async fn first_run_writes_all_six_collections() {
    let harness = Harness::new();
    let seeder = Seeder::new(harness.storage());

    let seeded = seeder.try_ensure_seeded().await.unwrap();
    assert_eq!(seeded, Collection::ALL.to_vec());

    for collection in Collection::ALL {
        let raw = harness.storage().read_raw(collection).await.unwrap();
        assert!(!raw.is_empty(), "{collection} should be seeded");
    }
}

#[tokio::test]
async fn seeding_twice_changes_nothing() {
    let store = Arc::new(FaultyStore::default());
    let harness = Harness::over(store.clone());
    let seeder = Seeder::new(harness.storage());

    seeder.ensure_seeded().await;
    let writes = store.writes();
    let before = harness.storage().read_raw(Collection::Posts).await.unwrap();

    assert!(seeder.try_ensure_seeded().await.unwrap().is_empty());
    assert_eq!(store.writes(), writes);
    assert_eq!(harness.storage().read_raw(Collection::Posts).await.unwrap(), before);
}

#[tokio::test]
async fn an_emptied_collection_stays_empty() {
    let store = Arc::new(MemoryStore::new());
    let harness = Harness::over(store.clone());
    let categories = harness.repo::<Category>();

    for category in categories.list().await {
        assert!(categories.delete(&category.id).await.unwrap());
    }

    assert!(categories.list().await.is_empty());
    assert!(Seeder::new(harness.storage())
        .try_ensure_seeded()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn only_missing_collections_are_seeded() {
    let harness = Harness::new();
    harness
        .store
        .set_item(Collection::Posts.key(), "[]")
        .await
        .unwrap();

    let seeded = Seeder::new(harness.storage()).try_ensure_seeded().await.unwrap();

    assert_eq!(seeded.len(), 5);
    assert!(!seeded.contains(&Collection::Posts));
    assert!(harness.repo::<Post>().list().await.is_empty());
}

#[tokio::test]
async fn seeded_posts_embed_snapshots() {
    let harness = Harness::new();
    let posts = harness.repo::<Post>().list().await;

    assert_eq!(posts.len(), 4);
    assert_eq!(posts[0].categories[0].name, "Uncategorized");
    assert_eq!(posts[0].comments.len(), 2);
    assert!(posts.iter().all(|post| post.author.username == "admin"));
}

#[tokio::test]
async fn blank_collection_value_is_reseeded() {
    let store = Arc::new(MemoryStore::new());
    store.set_item(Collection::Posts.key(), "").await.unwrap();
    let harness = Harness::over(store.clone());

    let posts = harness.repo::<Post>().try_list().await.unwrap();
    assert_eq!(posts.len(), 5);
    assert!(!store.get_item("posts").await.unwrap().unwrap().is_empty());
}
