//! # Cache/Sync Layer
//!
//! The dashboard's single source of truth: one in-memory snapshot per
//! collection, re-read from storage after every mutation. No optimistic
//! edits, no incremental patching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error};

use rp_core::{
    Category, Clock, Comment, Entity, Media, Page, Post, PostPatch, PostStatus, Repository,
    Result, Seeder, SessionProvider, Storage, Tag,
};

/// Entity types the dashboard may remove outright. Posts are only trashed.
pub trait HardDelete: Entity {}

impl HardDelete for Category {}
impl HardDelete for Tag {}
impl HardDelete for Comment {}
impl HardDelete for Media {}
impl HardDelete for Page {}

/// Clears the loading flag however the refresh ends, including cancellation.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Snapshot of one collection plus its loading flag.
pub struct CollectionCache<E: Entity> {
    repo: Repository<E>,
    items: RwLock<Vec<E>>,
    loading: AtomicBool,
}

impl<E: Entity> CollectionCache<E> {
    pub fn new(repo: Repository<E>) -> Self {
        Self {
            repo,
            items: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
        }
    }

    pub fn repository(&self) -> &Repository<E> {
        &self.repo
    }

    /// The cached records, in storage order.
    pub async fn items(&self) -> Vec<E> {
        self.items.read().await.clone()
    }

    /// Looks the id up in the cache; storage is not consulted.
    pub async fn get(&self, id: &str) -> Option<E> {
        self.items
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Re-reads the collection. On failure the previous snapshot stays.
    pub async fn refresh(&self) {
        let _loading = LoadingGuard::raise(&self.loading);
        match self.repo.try_list().await {
            Ok(records) => {
                debug!(collection = %E::COLLECTION, count = records.len(), "cache refreshed");
                *self.items.write().await = records;
            }
            Err(err) => {
                error!(
                    collection = %E::COLLECTION,
                    error = %err,
                    "refresh failed, keeping cached records"
                );
            }
        }
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E> {
        let created = self.repo.create(draft).await;
        self.refresh().await;
        created
    }

    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<Option<E>> {
        let updated = self.repo.update(id, patch).await;
        self.refresh().await;
        updated
    }
}

impl<E: HardDelete> CollectionCache<E> {
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.repo.delete(id).await;
        self.refresh().await;
        deleted
    }
}

impl CollectionCache<Post> {
    /// Soft delete: the post stays in storage with status `trash`.
    pub async fn trash(&self, id: &str) -> Result<Option<Post>> {
        self.update(
            id,
            PostPatch {
                status: Some(PostStatus::Trash),
                ..Default::default()
            },
        )
        .await
    }
}

/// Per-collection loading state, `true` while a refresh is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadingFlags {
    pub posts: bool,
    pub categories: bool,
    pub tags: bool,
    pub comments: bool,
    pub media: bool,
    pub pages: bool,
}

impl LoadingFlags {
    pub fn any(&self) -> bool {
        self.posts || self.categories || self.tags || self.comments || self.media || self.pages
    }
}

fn cached<E: Entity>(
    storage: &Storage,
    clock: &Arc<dyn Clock>,
    session: &Arc<dyn SessionProvider>,
) -> CollectionCache<E> {
    CollectionCache::new(Repository::new(
        storage.clone(),
        Arc::clone(clock),
        Arc::clone(session),
    ))
}

/// Explicit context object shared by every dashboard screen.
pub struct ApiCache {
    seeder: Seeder,
    posts: CollectionCache<Post>,
    categories: CollectionCache<Category>,
    tags: CollectionCache<Tag>,
    comments: CollectionCache<Comment>,
    media: CollectionCache<Media>,
    pages: CollectionCache<Page>,
}

impl ApiCache {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            seeder: Seeder::new(storage.clone()),
            posts: cached(&storage, &clock, &session),
            categories: cached(&storage, &clock, &session),
            tags: cached(&storage, &clock, &session),
            comments: cached(&storage, &clock, &session),
            media: cached(&storage, &clock, &session),
            pages: cached(&storage, &clock, &session),
        }
    }

    pub fn posts(&self) -> &CollectionCache<Post> {
        &self.posts
    }

    pub fn categories(&self) -> &CollectionCache<Category> {
        &self.categories
    }

    pub fn tags(&self) -> &CollectionCache<Tag> {
        &self.tags
    }

    pub fn comments(&self) -> &CollectionCache<Comment> {
        &self.comments
    }

    pub fn media(&self) -> &CollectionCache<Media> {
        &self.media
    }

    pub fn pages(&self) -> &CollectionCache<Page> {
        &self.pages
    }

    /// First-run seeding followed by a full refresh.
    pub async fn initialize(&self) {
        self.seeder.ensure_seeded().await;
        self.refresh_all().await;
    }

    pub async fn refresh_all(&self) {
        tokio::join!(
            self.posts.refresh(),
            self.categories.refresh(),
            self.tags.refresh(),
            self.comments.refresh(),
            self.media.refresh(),
            self.pages.refresh(),
        );
    }

    pub fn loading(&self) -> LoadingFlags {
        LoadingFlags {
            posts: self.posts.is_loading(),
            categories: self.categories.is_loading(),
            tags: self.tags.is_loading(),
            comments: self.comments.is_loading(),
            media: self.media.is_loading(),
            pages: self.pages.is_loading(),
        }
    }
}
