//! Create inputs (`New*`) and partial updates (`*Patch`) for every entity.
//!
//! Drafts leave out what `create` assigns (`id`, and `date`/`modified`/`author`
//! where the entity has them). Patches never carry server-owned fields.

use serde::{Deserialize, Serialize};

use crate::models::{
    Category, Comment, CommentAuthor, CommentStatus, Dimensions, EntityId, MediaKind, PostStatus,
    Tag,
};

/// URL-friendly form of a title or name: lowercased, whitespace runs become `-`.
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub status: PostStatus,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl NewPost {
    /// An empty draft whose slug is derived from the title.
    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            content: String::new(),
            excerpt: String::new(),
            featured_image: None,
            status: PostStatus::Draft,
            categories: Vec::new(),
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    /// `Some(None)` clears the featured image.
    pub featured_image: Option<Option<String>>,
    pub status: Option<PostStatus>,
    pub categories: Option<Vec<Category>>,
    pub tags: Option<Vec<Tag>>,
    pub comments: Option<Vec<Comment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPage {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    pub order: i32,
}

impl NewPage {
    pub fn titled(title: impl Into<String>, order: i32) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            content: String::new(),
            status: PostStatus::Draft,
            parent: None,
            order,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
    pub parent: Option<Option<EntityId>>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
}

impl NewCategory {
    /// A fresh, unused category with a slug derived from its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            description: None,
            count: 0,
            parent: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub count: Option<u32>,
    pub parent: Option<Option<EntityId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub count: u32,
}

impl NewTag {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            description: None,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub author: CommentAuthor,
    pub content: String,
    pub status: CommentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub author: Option<CommentAuthor>,
    pub content: Option<String>,
    pub status: Option<CommentStatus>,
    pub parent: Option<Option<EntityId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedia {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Partial media update. File fields (`url`, `kind`, `size`, `dimensions`)
/// are patched too when a replacement upload is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub alt: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub kind: Option<MediaKind>,
    pub size: Option<u64>,
    pub dimensions: Option<Option<Dimensions>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_whitespace_runs() {
        assert_eq!(slugify("  Hello   Rusty\tPress "), "hello-rusty-press");
        assert_eq!(slugify("Design"), "design");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn titled_draft_starts_as_draft() {
        let draft = NewPost::titled("My First Post");
        assert_eq!(draft.slug, "my-first-post");
        assert_eq!(draft.status, PostStatus::Draft);
        assert!(draft.categories.is_empty());
    }
}
