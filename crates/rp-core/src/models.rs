//! # Domain Models
//!
//! These structs represent the records of the Rusty-Press admin.
//! Field names serialize in the shape the dashboard persists them
//! (`featuredImage`, `type`, lowercase enum values).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Locally generated, never sequential.
pub type EntityId = String;

/// The six persisted collections, one storage key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Categories,
    Tags,
    Comments,
    Media,
    Pages,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Posts,
        Collection::Categories,
        Collection::Tags,
        Collection::Comments,
        Collection::Media,
        Collection::Pages,
    ];

    /// The storage key the collection lives under.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Categories => "categories",
            Collection::Tags => "tags",
            Collection::Comments => "comments",
            Collection::Media => "media",
            Collection::Pages => "pages",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Author,
    Contributor,
    Subscriber,
}

/// A dashboard account. Embedded by value into posts and pages as `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub name: String,
    pub email: String,
    /// Avatar image URL
    pub avatar: String,
    pub role: Role,
}

/// Publication state shared by posts and pages. No transition rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
    Pending,
    Private,
    Trash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: EntityId,
    pub title: String,
    /// Serialized editor document, stored verbatim.
    pub content: String,
    pub excerpt: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub author: User,
    pub date: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub status: PostStatus,
    /// Snapshots, not references: they do not follow later category edits.
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    /// Independent of the top-level comment collection.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author: User,
    pub date: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub status: PostStatus,
    /// Parent page id. Neither existence nor acyclicity is checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Usage counter maintained by callers, never recomputed here.
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Approved,
    Pending,
    Spam,
    Trash,
}

/// Inline commenter identity (visitors are not dashboard users).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub author: CommentAuthor,
    pub content: String,
    pub date: DateTime<Utc>,
    pub status: CommentStatus,
    /// Threading: the comment this one replies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaKind {
    /// Classifies an upload by its top-level MIME type.
    pub fn from_mime(mime: &mime::Mime) -> Self {
        let top = mime.type_();
        if top == mime::IMAGE {
            MediaKind::Image
        } else if top == mime::VIDEO {
            MediaKind::Video
        } else if top == mime::AUDIO {
            MediaKind::Audio
        } else {
            MediaKind::Document
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: EntityId,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Size in bytes
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}
