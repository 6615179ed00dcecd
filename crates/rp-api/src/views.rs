//! Read-only projections the dashboard screens build over cached records.

use serde::Serialize;

use rp_core::{Category, CommentStatus, Media, MediaKind, Post, PostStatus};

use crate::cache::ApiCache;

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Posts list filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub search: Option<String>,
}

impl PostFilter {
    /// Case-insensitive search over title and content.
    pub fn matches(&self, post: &Post) -> bool {
        let status = self.status.map_or(true, |status| post.status == status);
        let search = self.search.as_deref().map_or(true, |term| {
            contains_folded(&post.title, term) || contains_folded(&post.content, term)
        });
        status && search
    }
}

pub fn filter_posts<'a>(posts: &'a [Post], filter: &PostFilter) -> Vec<&'a Post> {
    posts.iter().filter(|post| filter.matches(post)).collect()
}

/// The status tabs above the posts table. `all` includes trashed posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub publish: usize,
    pub draft: usize,
    pub trash: usize,
}

impl StatusCounts {
    pub fn of(posts: &[Post]) -> Self {
        let count = |status| posts.iter().filter(|post| post.status == status).count();
        Self {
            all: posts.len(),
            publish: count(PostStatus::Publish),
            draft: count(PostStatus::Draft),
            trash: count(PostStatus::Trash),
        }
    }
}

/// Matches name or description; an empty term matches every category.
pub fn search_categories<'a>(categories: &'a [Category], term: &str) -> Vec<&'a Category> {
    categories
        .iter()
        .filter(|category| {
            contains_folded(&category.name, term)
                || category
                    .description
                    .as_deref()
                    .is_some_and(|description| contains_folded(description, term))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilter {
    pub kind: Option<MediaKind>,
    pub search: Option<String>,
}

impl MediaFilter {
    pub fn matches(&self, item: &Media) -> bool {
        let kind = self.kind.map_or(true, |kind| item.kind == kind);
        let search = self.search.as_deref().map_or(true, |term| {
            contains_folded(&item.title, term)
                || item
                    .description
                    .as_deref()
                    .is_some_and(|description| contains_folded(description, term))
        });
        kind && search
    }
}

pub fn filter_media<'a>(media: &'a [Media], filter: &MediaFilter) -> Vec<&'a Media> {
    media.iter().filter(|item| filter.matches(item)).collect()
}

/// Media library tab counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaCounts {
    pub all: usize,
    pub image: usize,
    pub video: usize,
    pub audio: usize,
    pub document: usize,
}

impl MediaCounts {
    pub fn of(media: &[Media]) -> Self {
        let count = |kind| media.iter().filter(|item| item.kind == kind).count();
        Self {
            all: media.len(),
            image: count(MediaKind::Image),
            video: count(MediaKind::Video),
            audio: count(MediaKind::Audio),
            document: count(MediaKind::Document),
        }
    }
}

/// Dashboard "At a Glance" widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtAGlance {
    pub published_posts: usize,
    pub draft_posts: usize,
    pub published_pages: usize,
    pub approved_comments: usize,
    pub pending_comments: usize,
    pub media_items: usize,
}

impl AtAGlance {
    pub async fn from_cache(cache: &ApiCache) -> Self {
        let posts = StatusCounts::of(&cache.posts().items().await);
        let pages = cache.pages().items().await;
        let comments = cache.comments().items().await;
        let comment_count = |status| comments.iter().filter(|c| c.status == status).count();
        Self {
            published_posts: posts.publish,
            draft_posts: posts.draft,
            published_pages: pages
                .iter()
                .filter(|page| page.status == PostStatus::Publish)
                .count(),
            approved_comments: comment_count(CommentStatus::Approved),
            pending_comments: comment_count(CommentStatus::Pending),
            media_items: cache.media().items().await.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::seed;

    #[test]
    fn post_filter_combines_status_and_search() {
        let posts = seed::posts();
        let filter = PostFilter {
            status: Some(PostStatus::Publish),
            search: Some("THEME".into()),
        };
        let hits = filter_posts(&posts, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Customizing Your Theme");

        assert_eq!(filter_posts(&posts, &PostFilter::default()).len(), 4);
    }

    #[test]
    fn status_counts_cover_every_tab() {
        let mut posts = seed::posts();
        posts[0].status = PostStatus::Trash;
        assert_eq!(
            StatusCounts::of(&posts),
            StatusCounts {
                all: 4,
                publish: 2,
                draft: 1,
                trash: 1
            }
        );
    }

    #[test]
    fn category_search_checks_descriptions() {
        let categories = seed::categories();
        let hits = search_categories(&categories, "tech related");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "technology");
        assert_eq!(search_categories(&categories, "").len(), 4);
    }

    #[test]
    fn media_filter_by_kind() {
        let mut media = seed::media();
        media[2].kind = MediaKind::Video;
        let videos = filter_media(
            &media,
            &MediaFilter {
                kind: Some(MediaKind::Video),
                search: None,
            },
        );
        assert_eq!(videos.len(), 1);
        assert_eq!(MediaCounts::of(&media).image, 2);
    }
}
