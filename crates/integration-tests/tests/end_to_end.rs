use chrono::Duration;
use integration_tests::Harness;
use rp_api::{AtAGlance, PostFilter, StatusCounts};
use rp_core::{Clock, NewPost, PostPatch, PostStatus};
use tokio_test::assert_ok;

#[tokio::test]
async fn dashboard_session_from_an_empty_store() {
    let harness = Harness::new();
    let cache = harness.cache();
    cache.initialize().await;

    assert_eq!(cache.posts().items().await.len(), 4);

    let created = assert_ok!(
        cache
            .posts()
            .create(NewPost {
                content: "<p>Draft body</p>".into(),
                ..NewPost::titled("Launch Notes")
            })
            .await
    );
    assert!(!created.id.is_empty());
    assert_eq!(created.status, PostStatus::Draft);
    assert_eq!(created.date.date_naive(), harness.clock.now().date_naive());
    assert_eq!(cache.posts().items().await.len(), 5);

    harness.clock.advance(Duration::seconds(30));
    let published = assert_ok!(
        cache
            .posts()
            .update(
                &created.id,
                PostPatch {
                    status: Some(PostStatus::Publish),
                    ..Default::default()
                },
            )
            .await
    )
    .unwrap();
    assert_eq!(published.status, PostStatus::Publish);
    assert!(published.modified > created.modified);
    assert_eq!(
        published,
        rp_core::Post {
            status: PostStatus::Publish,
            modified: published.modified,
            ..created.clone()
        }
    );

    assert!(assert_ok!(cache.categories().delete("4").await));
    let categories = cache.categories().items().await;
    assert_eq!(categories.len(), 3);
    assert!(categories.iter().all(|c| c.id != "4"));
}

#[tokio::test]
async fn trash_flow_feeds_the_dashboard_widgets() {
    let harness = Harness::new();
    let cache = harness.cache();
    cache.initialize().await;

    assert_ok!(cache.posts().trash("3").await);
    let posts = cache.posts().items().await;

    assert_eq!(
        StatusCounts::of(&posts),
        StatusCounts {
            all: 4,
            publish: 2,
            draft: 1,
            trash: 1,
        }
    );
    let trashed = rp_api::filter_posts(
        &posts,
        &PostFilter {
            status: Some(PostStatus::Trash),
            search: None,
        },
    );
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].id, "3");

    let glance = AtAGlance::from_cache(&cache).await;
    assert_eq!(glance.published_posts, 2);
    assert_eq!(glance.draft_posts, 1);
    assert_eq!(glance.published_pages, 3);
    assert_eq!(glance.approved_comments, 2);
    assert_eq!(glance.pending_comments, 1);
    assert_eq!(glance.media_items, 3);
}
