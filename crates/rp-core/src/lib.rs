//! rusty-press/crates/rp-core/src/lib.rs
//!
//! The record types, ports and generic persistence logic for Rusty-Press.

pub mod models;
pub mod traits;
pub mod error;
pub mod storage;
pub mod drafts;
pub mod entity;
pub mod seed;
pub mod repository;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
pub use drafts::*;
pub use entity::{Entity, Stamp};
pub use repository::Repository;
pub use seed::Seeder;
pub use storage::Storage;

#[cfg(test)]
mod tests {
    use super::seed;

    #[test]
    fn media_serializes_kind_as_type() {
        let media = seed::media().remove(0);
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["dimensions"]["width"], 1600);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn post_uses_camel_case_and_skips_missing_image() {
        let mut post = seed::posts().pop().unwrap();
        post.featured_image = None;
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["status"], "draft");
        assert!(json.get("featuredImage").is_none());
        assert_eq!(json["author"]["role"], "admin");
    }
}
