//! # rp-api
//!
//! The orchestration layer between the dashboard screens and storage:
//! the shared record cache and the projections built over it.

pub mod cache;
pub mod views;

pub use cache::{ApiCache, CollectionCache, HardDelete, LoadingFlags};
pub use views::{
    filter_media, filter_posts, search_categories, AtAGlance, MediaCounts, MediaFilter,
    PostFilter, StatusCounts,
};
