//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::models::User;

/// String key-value persistence, the stand-in for browser local storage.
///
/// Every call may suspend, so a network-backed store can replace a local one
/// without touching call sites.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key was never written (or was removed).
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replaces the whole value under `key`.
    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

/// Time source for `date`/`modified` stamps and cookie expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identity contract consumed by the repositories for author attribution.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns `true` when the credentials were accepted and the session stored.
    async fn login(&self, username: &str, password: &str, remember: bool) -> bool;
    async fn logout(&self);
    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<User>;
}

/// Media storage contract for handling uploads.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media_id.
    async fn save_upload(&self, data: Bytes, content_type: &str) -> anyhow::Result<String>;
    /// Returns the public URL of a saved upload.
    fn get_url(&self, media_id: &str) -> String;
}
