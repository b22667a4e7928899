/// Session model
///
/// A session is created at login and identifies one signed-in device. Both
/// JWTs issued for the session carry its ID in the `sid` claim. Only the
/// SHA-256 hash of the current refresh token is stored; rotating the refresh
/// token replaces the hash, and revoking the session ends every token issued
/// for it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     refresh_token_hash CHAR(64) NOT NULL,
///     user_agent VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL,
///     revoked_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Login session for one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session ID (the `sid` JWT claim)
    pub id: Uuid,

    /// Owner of the session
    pub user_id: Uuid,

    /// SHA-256 hex digest of the current refresh token
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,

    /// User agent reported at login
    pub user_agent: Option<String>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the refresh token was last rotated
    pub last_used_at: DateTime<Utc>,

    /// When the current refresh token stops being accepted
    pub expires_at: DateTime<Utc>,

    /// When the session was revoked (logout or token reuse)
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether tokens issued for this session are still accepted at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Pre-generated session ID, already embedded in the issued tokens
    pub id: Uuid,

    /// Owner of the session
    pub user_id: Uuid,

    /// SHA-256 hex digest of the refresh token
    pub refresh_token_hash: String,

    /// User agent reported at login
    pub user_agent: Option<String>,

    /// Refresh token expiry
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token_hash: "0".repeat(64),
            user_agent: None,
            created_at: now,
            last_used_at: now,
            expires_at: now + expires_in,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn test_active_session() {
        assert!(session(Duration::days(1), false).is_active(Utc::now()));
    }

    #[test]
    fn test_expired_session_is_inactive() {
        assert!(!session(Duration::seconds(-1), false).is_active(Utc::now()));
    }

    #[test]
    fn test_revoked_session_is_inactive() {
        assert!(!session(Duration::days(1), true).is_active(Utc::now()));
    }

    #[test]
    fn test_refresh_hash_is_not_serialized() {
        let json = serde_json::to_value(session(Duration::days(1), false)).unwrap();
        assert!(json.get("refreshTokenHash").is_none());
        assert!(json.get("expiresAt").is_some());
    }
}
