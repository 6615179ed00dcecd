//! Comments embedded in a post and the top-level comment collection are
//! stored independently and are not reconciled.

use integration_tests::Harness;
use rp_core::{Comment, CommentPatch, CommentStatus, Post, PostPatch};
use tokio_test::assert_ok;

#[tokio::test]
async fn moderating_a_comment_does_not_touch_the_post_copy() {
    let harness = Harness::new();
    let cache = harness.cache();
    cache.initialize().await;

    assert_ok!(
        cache
            .comments()
            .update(
                "1",
                CommentPatch {
                    status: Some(CommentStatus::Spam),
                    ..Default::default()
                },
            )
            .await
    );

    let top_level = cache.comments().get("1").await.unwrap();
    let embedded = cache.posts().get("1").await.unwrap().comments[0].clone();
    assert_eq!(top_level.status, CommentStatus::Spam);
    assert_eq!(embedded.id, "1");
    assert_eq!(embedded.status, CommentStatus::Approved);
}

#[tokio::test]
async fn deleting_a_comment_leaves_embedded_copies() {
    let harness = Harness::new();
    let cache = harness.cache();
    cache.initialize().await;

    assert!(assert_ok!(cache.comments().delete("2").await));

    assert!(cache.comments().get("2").await.is_none());
    let post = cache.posts().get("1").await.unwrap();
    assert!(post.comments.iter().any(|c| c.id == "2"));
}

#[tokio::test]
async fn editing_embedded_comments_leaves_the_collection() {
    let harness = Harness::new();
    let posts = harness.repo::<Post>();
    let comments = harness.repo::<Comment>();

    assert_ok!(
        posts
            .update(
                "1",
                PostPatch {
                    comments: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .await
    );

    assert!(posts.get_by_id("1").await.unwrap().comments.is_empty());
    assert_eq!(comments.list().await.len(), 3);
}
