//! Per-type field rules plugged into the generic [`Repository`](crate::repository::Repository).

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::drafts::{
    CategoryPatch, CommentPatch, MediaPatch, NewCategory, NewComment, NewMedia, NewPage, NewPost,
    NewTag, PagePatch, PostPatch, TagPatch,
};
use crate::models::{Category, Collection, Comment, EntityId, Media, Page, Post, Tag, User};
use crate::seed;

/// Server-assigned values handed to `from_draft` and `apply`.
#[derive(Debug, Clone)]
pub struct Stamp {
    now: DateTime<Utc>,
    author: Option<User>,
}

impl Stamp {
    pub fn new(now: DateTime<Utc>, author: Option<User>) -> Self {
        Self { now, author }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The session user, or the bundled administrator when nobody is signed in.
    pub fn author(&self) -> User {
        self.author.clone().unwrap_or_else(seed::administrator)
    }
}

/// A record type stored as one collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Create input, without `id` or server-assigned fields.
    type Draft: Send + 'static;
    /// Partial update, shallow-merged over the stored record.
    type Patch: Send + 'static;

    const COLLECTION: Collection;
    /// Whether `create` attributes the record to the session user.
    const AUTHORED: bool = false;

    fn id(&self) -> &str;
    fn from_draft(id: EntityId, draft: Self::Draft, stamp: &Stamp) -> Self;
    fn apply(&mut self, patch: Self::Patch, stamp: &Stamp);
}

fn merge<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Moves `modified` to `now`, or one millisecond past its old value when the
/// clock has not advanced, so every update is observable.
fn refresh_modified(modified: &mut DateTime<Utc>, now: DateTime<Utc>) {
    *modified = if now > *modified {
        now
    } else {
        *modified + Duration::milliseconds(1)
    };
}

impl Entity for Post {
    type Draft = NewPost;
    type Patch = PostPatch;

    const COLLECTION: Collection = Collection::Posts;
    const AUTHORED: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewPost, stamp: &Stamp) -> Self {
        Post {
            id,
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            slug: draft.slug,
            featured_image: draft.featured_image,
            author: stamp.author(),
            date: stamp.now(),
            modified: stamp.now(),
            status: draft.status,
            categories: draft.categories,
            tags: draft.tags,
            comments: draft.comments,
        }
    }

    fn apply(&mut self, patch: PostPatch, stamp: &Stamp) {
        merge(&mut self.title, patch.title);
        merge(&mut self.content, patch.content);
        merge(&mut self.excerpt, patch.excerpt);
        merge(&mut self.slug, patch.slug);
        merge(&mut self.featured_image, patch.featured_image);
        merge(&mut self.status, patch.status);
        merge(&mut self.categories, patch.categories);
        merge(&mut self.tags, patch.tags);
        merge(&mut self.comments, patch.comments);
        refresh_modified(&mut self.modified, stamp.now());
    }
}

impl Entity for Page {
    type Draft = NewPage;
    type Patch = PagePatch;

    const COLLECTION: Collection = Collection::Pages;
    const AUTHORED: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewPage, stamp: &Stamp) -> Self {
        Page {
            id,
            title: draft.title,
            content: draft.content,
            slug: draft.slug,
            author: stamp.author(),
            date: stamp.now(),
            modified: stamp.now(),
            status: draft.status,
            parent: draft.parent,
            order: draft.order,
        }
    }

    fn apply(&mut self, patch: PagePatch, stamp: &Stamp) {
        merge(&mut self.title, patch.title);
        merge(&mut self.content, patch.content);
        merge(&mut self.slug, patch.slug);
        merge(&mut self.status, patch.status);
        merge(&mut self.parent, patch.parent);
        merge(&mut self.order, patch.order);
        refresh_modified(&mut self.modified, stamp.now());
    }
}

impl Entity for Category {
    type Draft = NewCategory;
    type Patch = CategoryPatch;

    const COLLECTION: Collection = Collection::Categories;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewCategory, _stamp: &Stamp) -> Self {
        Category {
            id,
            name: draft.name,
            slug: draft.slug,
            description: draft.description,
            count: draft.count,
            parent: draft.parent,
        }
    }

    fn apply(&mut self, patch: CategoryPatch, _stamp: &Stamp) {
        merge(&mut self.name, patch.name);
        merge(&mut self.slug, patch.slug);
        merge(&mut self.description, patch.description);
        merge(&mut self.count, patch.count);
        merge(&mut self.parent, patch.parent);
    }
}

impl Entity for Tag {
    type Draft = NewTag;
    type Patch = TagPatch;

    const COLLECTION: Collection = Collection::Tags;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewTag, _stamp: &Stamp) -> Self {
        Tag {
            id,
            name: draft.name,
            slug: draft.slug,
            description: draft.description,
            count: draft.count,
        }
    }

    fn apply(&mut self, patch: TagPatch, _stamp: &Stamp) {
        merge(&mut self.name, patch.name);
        merge(&mut self.slug, patch.slug);
        merge(&mut self.description, patch.description);
        merge(&mut self.count, patch.count);
    }
}

impl Entity for Comment {
    type Draft = NewComment;
    type Patch = CommentPatch;

    const COLLECTION: Collection = Collection::Comments;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewComment, stamp: &Stamp) -> Self {
        Comment {
            id,
            author: draft.author,
            content: draft.content,
            date: stamp.now(),
            status: draft.status,
            parent: draft.parent,
        }
    }

    fn apply(&mut self, patch: CommentPatch, _stamp: &Stamp) {
        merge(&mut self.author, patch.author);
        merge(&mut self.content, patch.content);
        merge(&mut self.status, patch.status);
        merge(&mut self.parent, patch.parent);
    }
}

impl Entity for Media {
    type Draft = NewMedia;
    type Patch = MediaPatch;

    const COLLECTION: Collection = Collection::Media;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: NewMedia, stamp: &Stamp) -> Self {
        Media {
            id,
            title: draft.title,
            url: draft.url,
            alt: draft.alt,
            description: draft.description,
            date: stamp.now(),
            kind: draft.kind,
            size: draft.size,
            dimensions: draft.dimensions,
        }
    }

    fn apply(&mut self, patch: MediaPatch, _stamp: &Stamp) {
        merge(&mut self.title, patch.title);
        merge(&mut self.url, patch.url);
        merge(&mut self.alt, patch.alt);
        merge(&mut self.description, patch.description);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.size, patch.size);
        merge(&mut self.dimensions, patch.dimensions);
    }
}
