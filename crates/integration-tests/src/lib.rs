//! Shared fixtures for the integration test binaries.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rp_api::ApiCache;
use rp_core::{
    Clock, Entity, KeyValueStore, MockSessionProvider, Repository, SessionProvider, Storage, User,
};
use rp_storage_local::MemoryStore;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct StepClock {
    now: Mutex<DateTime<Utc>>,
}

impl StepClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn signed_out() -> Arc<dyn SessionProvider> {
    let mut session = MockSessionProvider::new();
    session.expect_current_user().returning(|| None);
    Arc::new(session)
}

pub fn signed_in(user: User) -> Arc<dyn SessionProvider> {
    let mut session = MockSessionProvider::new();
    session
        .expect_current_user()
        .returning(move || Some(user.clone()));
    Arc::new(session)
}

/// A [`MemoryStore`] whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FaultyStore {
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Successful `set_item` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FaultyStore {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("read of `{key}` refused");
        }
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("write of `{key}` refused");
        }
        self.inner.set_item(key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.inner.remove_item(key).await
    }
}

/// One store, one clock, one session: what a dashboard process holds.
pub struct Harness {
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<StepClock>,
    pub session: Arc<dyn SessionProvider>,
}

impl Harness {
    /// Empty in-memory store, signed out, clock at the current time.
    pub fn new() -> Self {
        Self::over(Arc::new(MemoryStore::new()))
    }

    pub fn over(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(StepClock::starting_at(Utc::now())),
            session: signed_out(),
        }
    }

    pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = session;
        self
    }

    pub fn storage(&self) -> Storage {
        Storage::new(Arc::clone(&self.store))
    }

    pub fn repo<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.storage(), self.clock.clone(), Arc::clone(&self.session))
    }

    pub fn cache(&self) -> ApiCache {
        ApiCache::new(self.storage(), self.clock.clone(), Arc::clone(&self.session))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
