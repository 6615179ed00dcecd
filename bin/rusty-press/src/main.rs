//! # Rusty-Press Binary
//!
//! Assembles the dashboard data layer from compile-time features and the
//! loaded settings, imports any files named on the command line into the
//! media library, then prints the dashboard summary as JSON.

use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use configs::{LogSettings, Settings, StorageBackend, StorageSettings};
use rp_api::{ApiCache, AtAGlance};
use rp_core::{Clock, KeyValueStore, SessionProvider, Storage, SystemClock};
use rp_ui::ThemePreferences;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-sqlite")]
use rp_db_sqlite::SqliteStore;

#[cfg(feature = "storage-local")]
use rp_storage_local::{FileStore, LocalMediaStore, MemoryStore};

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_store(settings: &StorageSettings) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match settings.backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "storage-local")]
        StorageBackend::File => Ok(Arc::new(FileStore::new(settings.path.clone()))),
        #[cfg(feature = "db-sqlite")]
        StorageBackend::Sqlite => Ok(Arc::new(
            SqliteStore::new(&settings.sqlite_url)
                .await
                .context("Failed to init SQLite")?,
        )),
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("storage backend {other:?} is not compiled into this build"),
    }
}

#[cfg(feature = "auth-simple")]
async fn open_session(
    settings: &Settings,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<dyn SessionProvider>> {
    use rp_auth_simple::{hash_password, SimpleSessionProvider};
    use secrecy::ExposeSecret;

    let account = rp_core::User {
        username: settings.auth.username.trim().to_string(),
        ..rp_core::seed::administrator()
    };
    let hash = hash_password(settings.auth.password.expose_secret())?;
    let session = SimpleSessionProvider::new(store, clock, account, hash);
    match session.restore().await {
        Some(user) => info!(username = %user.username, "session restored"),
        None => info!("no active session"),
    }
    Ok(Arc::new(session))
}

#[cfg(not(feature = "auth-simple"))]
async fn open_session(
    _settings: &Settings,
    _store: Arc<dyn KeyValueStore>,
    _clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<dyn SessionProvider>> {
    Ok(Arc::new(SignedOut))
}

/// Session stand-in when no auth plugin is compiled in.
#[cfg(not(feature = "auth-simple"))]
struct SignedOut;

#[cfg(not(feature = "auth-simple"))]
#[async_trait::async_trait]
impl SessionProvider for SignedOut {
    async fn login(&self, _username: &str, _password: &str, _remember: bool) -> bool {
        false
    }
    async fn logout(&self) {}
    async fn current_user(&self) -> Option<rp_core::User> {
        None
    }
}

#[cfg(feature = "storage-local")]
async fn import_media(
    settings: &Settings,
    cache: &ApiCache,
    paths: &[String],
) -> anyhow::Result<()> {
    let media = LocalMediaStore::new(
        settings.media.root.clone(),
        settings.media.url_prefix.clone(),
    );
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {path}"))?;
        let file_name = std::path::Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        let draft = media.ingest(&file_name, None, bytes::Bytes::from(data)).await?;
        let item = cache.media().create(draft).await?;
        info!(id = %item.id, url = %item.url, "imported media");
    }
    Ok(())
}

#[cfg(not(feature = "storage-local"))]
async fn import_media(
    _settings: &Settings,
    _cache: &ApiCache,
    paths: &[String],
) -> anyhow::Result<()> {
    if !paths.is_empty() {
        warn!(count = paths.len(), "media import needs the storage-local feature");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = open_store(&settings.storage).await?;
    let session = open_session(&settings, Arc::clone(&store), Arc::clone(&clock)).await?;

    let cache = ApiCache::new(Storage::new(Arc::clone(&store)), clock, session);
    cache.initialize().await;
    if cache.loading().any() {
        warn!("some collections did not finish loading");
    }

    let paths: Vec<String> = std::env::args().skip(1).collect();
    import_media(&settings, &cache, &paths).await?;

    let theme = ThemePreferences::new(store).current().await;
    let summary = serde_json::json!({
        "atAGlance": AtAGlance::from_cache(&cache).await,
        "loading": cache.loading(),
        "theme": theme.name,
        "stylesheet": theme.stylesheet().render()?,
    });

    info!(backend = ?settings.storage.backend, "Rusty-Press ready");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
