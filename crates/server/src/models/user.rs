//! User domain types.
//!
//! These types represent validated domain objects separate from database
//! row types. The stored password hash is deliberately absent from [`User`];
//! credential material only ever travels through the dedicated repository
//! methods that need it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shipline_core::{Email, UserId, UserRole};

/// A user account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (globally unique across roles).
    pub email: Email,
    /// Account role.
    pub role: UserRole,
    /// Avatar URL, if set.
    pub avatar: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new user.
#[derive(Debug)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Argon2id password hash, never plaintext.
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
    /// Avatar URL, if any.
    pub avatar: Option<String>,
}

/// User payload returned to clients.
///
/// This is the only user shape that crosses the HTTP boundary; it has
/// no password field at all, so a hash cannot leak into a response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(1),
            name: "Ada".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
            role: UserRole::Buyer,
            avatar: Some("https://example.com/a.png".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_never_contains_credentials() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_response_camel_case_fields() {
        let response = UserResponse::from(sample_user());
        let value: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["role"], "buyer");
        assert_eq!(value["avatar"], "https://example.com/a.png");
    }
}
