//! The stored session: base64 over JSON `{ "user": .., "expiresAt": .. }`.
//!
//! Nothing read back from the store is trusted until it has gone through
//! [`decode_session`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rp_core::User;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store key of the session cookie.
pub const AUTH_KEY: &str = "rusty_press_auth";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("session is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session user is incomplete: missing {0}")]
    InvalidUser(&'static str),

    #[error("session expired at {0}")]
    Expired(DateTime<Utc>),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCookie {
    user: User,
    expires_at: DateTime<Utc>,
}

/// Trims every text field and rejects users without an id or username.
pub fn sanitize(user: &User) -> Result<User, SessionError> {
    let clean = User {
        id: user.id.trim().to_string(),
        username: user.username.trim().to_string(),
        name: user.name.trim().to_string(),
        email: user.email.trim().to_string(),
        avatar: user.avatar.trim().to_string(),
        role: user.role,
    };
    if clean.id.is_empty() {
        return Err(SessionError::InvalidUser("id"));
    }
    if clean.username.is_empty() {
        return Err(SessionError::InvalidUser("username"));
    }
    Ok(clean)
}

pub fn encode_session(user: &User, expires_at: DateTime<Utc>) -> Result<String, SessionError> {
    let cookie = SessionCookie {
        user: sanitize(user)?,
        expires_at,
    };
    Ok(STANDARD.encode(serde_json::to_vec(&cookie)?))
}

pub fn decode_session(raw: &str, now: DateTime<Utc>) -> Result<User, SessionError> {
    let bytes = STANDARD.decode(raw.trim())?;
    let cookie: SessionCookie = serde_json::from_slice(&bytes)?;
    if cookie.expires_at <= now {
        return Err(SessionError::Expired(cookie.expires_at));
    }
    sanitize(&cookie.user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rp_core::seed;

    #[test]
    fn round_trip_trims_fields() {
        let mut user = seed::administrator();
        user.name = "  Administrator ".into();
        let now = Utc::now();

        let raw = encode_session(&user, now + Duration::days(1)).unwrap();
        let back = decode_session(&raw, now).unwrap();

        assert_eq!(back.name, "Administrator");
        assert_eq!(back.id, user.id);
    }

    #[test]
    fn rejects_each_failure_mode() {
        let now = Utc::now();
        assert!(matches!(
            decode_session("%%%", now),
            Err(SessionError::Encoding(_))
        ));
        assert!(matches!(
            decode_session(&STANDARD.encode("{\"user\":1}"), now),
            Err(SessionError::Json(_))
        ));

        let stale = encode_session(&seed::administrator(), now - Duration::seconds(1)).unwrap();
        assert!(matches!(
            decode_session(&stale, now),
            Err(SessionError::Expired(_))
        ));

        let mut nameless = seed::administrator();
        nameless.username = "   ".into();
        let forged = STANDARD.encode(
            serde_json::json!({ "user": nameless, "expiresAt": now + Duration::days(1) })
                .to_string(),
        );
        assert!(matches!(
            decode_session(&forged, now),
            Err(SessionError::InvalidUser("username"))
        ));
    }
}
