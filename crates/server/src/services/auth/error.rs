//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shipline_core::EmailError),

    /// Unknown account role in the signup payload.
    #[error("invalid role: {0}")]
    InvalidRole(#[from] shipline_core::UserRoleError),

    /// No account uses this email.
    #[error("user does not exist")]
    UserNotFound,

    /// An account with this email already exists.
    #[error("user with same email already exists")]
    EmailTaken,

    /// Password verification failed.
    #[error("wrong password")]
    WrongPassword,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
