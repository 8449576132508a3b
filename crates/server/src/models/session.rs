//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use shipline_core::{Email, UserId, UserRole};

/// Session-stored user identity.
///
/// Snapshot of the logged-in user taken at login/signup time. It carries
/// no credential material: password checks always go back to the
/// database, so a password change in the same session cannot compare
/// against a stale hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name at login time.
    pub name: String,
    /// Email at login time.
    pub email: Email,
    /// Account role.
    pub role: UserRole,
    /// Avatar URL at login time.
    pub avatar: Option<String>,
}

impl From<crate::models::user::User> for CurrentUser {
    fn from(user: crate::models::user::User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
