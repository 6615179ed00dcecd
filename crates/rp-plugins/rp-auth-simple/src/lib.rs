//! # rp-auth-simple
//!
//! Argon2-based implementation of `SessionProvider` for a single
//! configured dashboard account. The session lives in the shared
//! key-value store under [`AUTH_KEY`].

mod cookie;

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Duration;
use rp_core::traits::{Clock, KeyValueStore, SessionProvider};
use rp_core::User;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub use cookie::{decode_session, encode_session, sanitize, SessionError, AUTH_KEY};

/// Session lifetime with "remember me" ticked.
pub const REMEMBER_DAYS: i64 = 30;
/// Session lifetime otherwise.
pub const SESSION_DAYS: i64 = 1;

/// Produces an argon2 PHC string for the configured account password.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; 16];
    getrandom::getrandom(&mut salt).map_err(|e| anyhow::anyhow!("salt: {e}"))?;
    let salt = SaltString::encode_b64(&salt).map_err(|e| anyhow::anyhow!("salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hashing: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub struct SimpleSessionProvider {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    account: User,
    password_hash: String,
    user: RwLock<Option<User>>,
}

impl SimpleSessionProvider {
    /// Starts signed out; call [`restore`](Self::restore) to pick up a stored session.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        account: User,
        password_hash: String,
    ) -> Self {
        Self {
            store,
            clock,
            account,
            password_hash,
            user: RwLock::new(None),
        }
    }

    /// Loads the stored session. A cookie that fails validation is removed.
    pub async fn restore(&self) -> Option<User> {
        let raw = match self.store.get_item(AUTH_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "session cookie unreadable");
                return None;
            }
        };
        match decode_session(&raw, self.clock.now()) {
            Ok(user) => {
                *self.user.write().await = Some(user.clone());
                Some(user)
            }
            Err(err) => {
                warn!(error = %err, "discarding session cookie");
                self.forget().await;
                None
            }
        }
    }

    async fn forget(&self) {
        *self.user.write().await = None;
        if let Err(err) = self.store.remove_item(AUTH_KEY).await {
            warn!(error = %err, "could not remove session cookie");
        }
    }
}

#[async_trait]
impl SessionProvider for SimpleSessionProvider {
    async fn login(&self, username: &str, password: &str, remember: bool) -> bool {
        if username.trim() != self.account.username
            || !verify_password(password, &self.password_hash)
        {
            debug!(username, "login rejected");
            return false;
        }

        let days = if remember { REMEMBER_DAYS } else { SESSION_DAYS };
        let expires_at = self.clock.now() + Duration::days(days);
        let stored = match sanitize(&self.account) {
            Ok(user) => match encode_session(&user, expires_at) {
                Ok(raw) => self
                    .store
                    .set_item(AUTH_KEY, &raw)
                    .await
                    .map(|()| user)
                    .map_err(|e| e.to_string()),
                Err(err) => Err(err.to_string()),
            },
            Err(err) => Err(err.to_string()),
        };

        match stored {
            Ok(user) => {
                *self.user.write().await = Some(user);
                true
            }
            Err(reason) => {
                warn!(%reason, "failed to store session cookie");
                *self.user.write().await = None;
                false
            }
        }
    }

    async fn logout(&self) {
        self.forget().await;
    }

    async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use chrono::{DateTime, Utc};
    use rp_core::seed;
    use rp_storage_local::MemoryStore;
    use std::sync::Mutex;

    struct StepClock(Mutex<DateTime<Utc>>);

    impl StepClock {
        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn provider(store: Arc<MemoryStore>, clock: Arc<StepClock>) -> SimpleSessionProvider {
        SimpleSessionProvider::new(
            store,
            clock,
            seed::administrator(),
            hash_password("password").unwrap(),
        )
    }

    #[tokio::test]
    async fn login_persists_a_session_that_restores() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(StepClock(Mutex::new(Utc::now())));
        let session = provider(store.clone(), clock.clone());

        assert!(!session.login("admin", "wrong", false).await);
        assert!(session.current_user().await.is_none());
        assert!(session.login(" admin ", "password", true).await);

        let fresh = provider(store, clock.clone());
        clock.advance(Duration::days(29));
        assert_eq!(fresh.restore().await, Some(seed::administrator()));
        assert_eq!(fresh.current_user().await, Some(seed::administrator()));
    }

    #[tokio::test]
    async fn expired_session_is_removed() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(StepClock(Mutex::new(Utc::now())));
        let session = provider(store.clone(), clock.clone());
        assert!(session.login("admin", "password", false).await);

        clock.advance(Duration::days(2));
        let later = provider(store.clone(), clock);
        assert!(later.restore().await.is_none());
        assert_eq!(store.get_item(AUTH_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tampered_cookie_is_removed() {
        let store = Arc::new(MemoryStore::new());
        let forged = base64::engine::general_purpose::STANDARD.encode("{\"user\":{}}");
        store.set_item(AUTH_KEY, &forged).await.unwrap();
        let session = provider(store.clone(), Arc::new(StepClock(Mutex::new(Utc::now()))));

        assert!(session.restore().await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn logout_clears_user_and_cookie() {
        let store = Arc::new(MemoryStore::new());
        let session = provider(store.clone(), Arc::new(StepClock(Mutex::new(Utc::now()))));
        assert!(session.login("admin", "password", false).await);

        session.logout().await;
        assert!(session.current_user().await.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("password").unwrap();
        let b = hash_password("password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("password", &a));
        assert!(!verify_password("nope", &a));
        assert!(!verify_password("password", "not-a-phc-string"));
    }
}
