/// User model
///
/// Users register with a display name, a unique username, a unique email, and
/// a password. Username and email are trimmed and lower-cased before they are
/// stored or looked up, so uniqueness is case-insensitive.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     username VARCHAR(30) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// The password hash is never serialized; a `User` can be returned from
/// handlers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Login name (lower-case, unique)
    pub username: String,

    /// Email address (lower-case, unique)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns the `{id, username, email}` summary embedded in other views
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Compact user reference embedded in project and task views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Email address
    pub email: String,
}

/// Input for creating a new user
///
/// Build it through [`CreateUser::new`] so identity fields are normalized.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Normalized username
    pub username: String,

    /// Normalized email
    pub email: String,

    /// Argon2id password hash (never plaintext)
    pub password_hash: String,
}

impl CreateUser {
    /// Creates user input with trimmed name and normalized username/email
    pub fn new(name: &str, username: &str, email: &str, password_hash: String) -> Self {
        Self {
            name: name.trim().to_string(),
            username: normalize_identity(username),
            email: normalize_identity(email),
            password_hash,
        }
    }
}

/// Normalizes a username or email for storage and lookup
pub fn normalize_identity(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_user_normalizes_identity() {
        let input = CreateUser::new("  Ada ", "  AdaL ", " ADA@Example.COM ", "hash".to_string());

        assert_eq!(input.name, "Ada");
        assert_eq!(input.username, "adal");
        assert_eq!(input.email, "ada@example.com");
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ada");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_summary() {
        let user = sample_user();
        let summary = user.summary();

        assert_eq!(summary.id, user.id);
        assert_eq!(summary.username, "ada");
        assert_eq!(summary.email, "ada@example.com");
    }
}
