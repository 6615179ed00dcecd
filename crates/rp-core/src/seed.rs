//! # Seed Initializer
//!
//! First-run population of the six collections from the bundled dataset.
//! A collection that already exists is never touched, even when empty.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{
    Category, Collection, Comment, CommentAuthor, CommentStatus, Dimensions, Media, MediaKind,
    Page, Post, PostStatus, Role, Tag, User,
};
use crate::storage::Storage;

const DEFAULT_AVATAR: &str =
    "https://www.gravatar.com/avatar/00000000000000000000000000000000?d=mp&f=y";

#[derive(Clone)]
pub struct Seeder {
    storage: Storage,
}

impl Seeder {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Seeds every absent collection and reports which ones were written.
    pub async fn try_ensure_seeded(&self) -> Result<Vec<Collection>> {
        let mut seeded = Vec::new();
        for collection in Collection::ALL {
            if self.storage.contains(collection).await? {
                continue;
            }
            self.seed(collection).await?;
            seeded.push(collection);
        }
        Ok(seeded)
    }

    /// Idempotent; failures are logged, never propagated.
    pub async fn ensure_seeded(&self) {
        match self.try_ensure_seeded().await {
            Ok(seeded) if !seeded.is_empty() => debug!(?seeded, "seeded bundled collections"),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "seeding skipped"),
        }
    }

    async fn seed(&self, collection: Collection) -> Result<()> {
        match collection {
            Collection::Posts => self.storage.write(collection, &posts()).await,
            Collection::Categories => self.storage.write(collection, &categories()).await,
            Collection::Tags => self.storage.write(collection, &tags()).await,
            Collection::Comments => self.storage.write(collection, &comments()).await,
            Collection::Media => self.storage.write(collection, &media()).await,
            Collection::Pages => self.storage.write(collection, &pages()).await,
        }
    }
}

fn november(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The account every bundled post and page is attributed to.
pub fn administrator() -> User {
    User {
        id: "1".into(),
        username: "admin".into(),
        name: "Administrator".into(),
        email: "admin@rusty-press.dev".into(),
        avatar: DEFAULT_AVATAR.into(),
        role: Role::Admin,
    }
}

pub fn categories() -> Vec<Category> {
    [
        ("1", "Uncategorized", "Default category", 3),
        ("2", "Technology", "Tech related posts", 2),
        ("3", "Design", "Design related posts", 1),
        ("4", "Business", "Business related posts", 1),
    ]
    .into_iter()
    .map(|(id, name, description, count)| Category {
        id: id.into(),
        name: name.into(),
        slug: name.to_lowercase(),
        description: Some(description.into()),
        count,
        parent: None,
    })
    .collect()
}

pub fn tags() -> Vec<Tag> {
    [
        ("1", "Rust", "Rust related posts", 2),
        ("2", "Tokio", "Async runtime posts", 2),
        ("3", "WebAssembly", "WebAssembly related posts", 3),
        ("4", "CSS", "CSS related posts", 1),
    ]
    .into_iter()
    .map(|(id, name, description, count)| Tag {
        id: id.into(),
        name: name.into(),
        slug: name.to_lowercase(),
        description: Some(description.into()),
        count,
    })
    .collect()
}

pub fn comments() -> Vec<Comment> {
    [
        (
            "1",
            "John Doe",
            "john@example.com",
            '0',
            "Great post! I really enjoyed reading it.",
            15,
            CommentStatus::Approved,
        ),
        (
            "2",
            "Jane Smith",
            "jane@example.com",
            '1',
            "Thanks for sharing this information. It was very helpful.",
            16,
            CommentStatus::Approved,
        ),
        (
            "3",
            "Bob Johnson",
            "bob@example.com",
            '2',
            "I have a question about this topic. Can you elaborate more?",
            17,
            CommentStatus::Pending,
        ),
    ]
    .into_iter()
    .map(|(id, name, email, hash, content, day, status)| Comment {
        id: id.into(),
        author: CommentAuthor {
            name: name.into(),
            email: email.into(),
            url: None,
            avatar: Some(format!(
                "https://www.gravatar.com/avatar/{}?d=mp&f=y",
                hash.to_string().repeat(32)
            )),
        },
        content: content.into(),
        date: november(day),
        status,
        parent: None,
    })
    .collect()
}

pub fn media() -> Vec<Media> {
    [
        ("1", "6827515", "A sample image for testing", 10, 100),
        ("2", "374631", "Another sample image for testing", 11, 200),
        ("3", "693859", "Yet another sample image for testing", 12, 300),
    ]
    .into_iter()
    .map(|(id, photo, description, day, kib)| Media {
        id: id.into(),
        title: format!("Sample Image {id}"),
        url: photo_url(photo),
        alt: Some(format!("Sample image {id}")),
        description: Some(description.into()),
        date: november(day),
        kind: MediaKind::Image,
        size: kib * 1024,
        dimensions: Some(Dimensions {
            width: 1600,
            height: 900,
        }),
    })
    .collect()
}

fn photo_url(photo: &str) -> String {
    format!("https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg")
}

pub fn posts() -> Vec<Post> {
    let categories = categories();
    let tags = tags();
    let comments = comments();
    let author = administrator();

    let post = |id: &str,
                title: &str,
                content: &str,
                excerpt: &str,
                photo: Option<&str>,
                day: u32,
                status: PostStatus,
                categories: Vec<Category>,
                tags: Vec<Tag>,
                comments: Vec<Comment>| Post {
        id: id.into(),
        title: title.into(),
        content: content.into(),
        excerpt: excerpt.into(),
        slug: crate::drafts::slugify(title),
        featured_image: photo.map(photo_url),
        author: author.clone(),
        date: november(day),
        modified: november(day),
        status,
        categories,
        tags,
        comments,
    };

    vec![
        post(
            "1",
            "Welcome to Rusty Press",
            "<p>Welcome to Rusty Press! This is your first post. \
             Edit or delete it, then start writing!</p>\
             <p>This is a paragraph with some <strong>bold text</strong> \
             and some <em>italic text</em>.</p>\
             <h2>This is a heading</h2>\
             <ul><li>Item 1</li><li>Item 2</li><li>Item 3</li></ul>\
             <blockquote><p>This is a blockquote.</p></blockquote>",
            "Welcome to Rusty Press! This is your first post. \
             Edit or delete it, then start writing!",
            Some("6827515"),
            15,
            PostStatus::Publish,
            vec![categories[0].clone()],
            vec![tags[0].clone()],
            vec![comments[0].clone(), comments[1].clone()],
        ),
        post(
            "2",
            "Getting Started with Rusty Press",
            "<p>This is a guide to help you get started with Rusty Press.</p>\
             <h2>Features</h2>\
             <ul><li>Post Management</li><li>Page Management</li><li>Media Library</li>\
             <li>Comments</li><li>Categories and Tags</li></ul>",
            "This is a guide to help you get started with Rusty Press.",
            Some("374631"),
            16,
            PostStatus::Publish,
            vec![categories[1].clone()],
            vec![tags[1].clone(), tags[2].clone()],
            vec![comments[2].clone()],
        ),
        post(
            "3",
            "Customizing Your Theme",
            "<p>Learn how to customize your theme in Rusty Press.</p>\
             <h2>Theme Settings</h2><p>Pick a palette from the theme settings panel.</p>",
            "Learn how to customize your theme in Rusty Press.",
            Some("693859"),
            17,
            PostStatus::Publish,
            vec![categories[2].clone()],
            vec![tags[3].clone()],
            Vec::new(),
        ),
        post(
            "4",
            "Draft Post Example",
            "<p>This is a draft post. \
             It will not be visible to visitors until it is published.</p>",
            "This is a draft post.",
            None,
            18,
            PostStatus::Draft,
            vec![categories[0].clone()],
            Vec::new(),
            Vec::new(),
        ),
    ]
}

pub fn pages() -> Vec<Page> {
    [
        ("1", "Home", "<p>Welcome to our home page!</p>", 1),
        ("2", "About", "<p>This is the about page.</p>", 2),
        ("3", "Contact", "<p>Contact us here.</p>", 3),
    ]
    .into_iter()
    .map(|(id, title, content, order)| Page {
        id: id.into(),
        title: title.into(),
        content: content.into(),
        slug: title.to_lowercase(),
        author: administrator(),
        date: november(15),
        modified: november(15),
        status: PostStatus::Publish,
        parent: None,
        order,
    })
    .collect()
}
