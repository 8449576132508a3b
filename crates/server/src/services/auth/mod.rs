//! Authentication service.
//!
//! Signup, login, and password changes against the user repository.
//! Passwords are hashed with Argon2id (salted, one-way); verification
//! always reads the stored hash from the database.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use shipline_core::{Email, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// The email-uniqueness check is the database unique index: a
    /// duplicate insert surfaces as `EmailTaken` even under concurrent
    /// signups.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidRole` if the role string is unknown.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let role: UserRole = role.parse()?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let new_user = NewUser {
            name: name.to_owned(),
            email,
            password_hash,
            role,
            avatar: None,
        };

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Repository(other),
        })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account uses this email.
    /// Returns `AuthError::WrongPassword` if verification fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .find_with_password_hash(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Change a user's password after checking the old one.
    ///
    /// The old hash is re-read from the database by user id, so repeated
    /// changes within one session always verify against the fresh hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    /// Returns `AuthError::WrongPassword` if the old password is wrong.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet requirements.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let stored_hash = self
            .users
            .password_hash_by_id(user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        verify_password(old_password, &stored_hash)?;

        validate_password(new_password)?;
        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::WrongPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::WrongPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(matches!(
            verify_password("incorrect horse", &hash),
            Err(AuthError::WrongPassword)
        ));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_verify_rejects_garbage_stored_hash() {
        assert!(matches!(
            verify_password("whatever1", "not-a-phc-string"),
            Err(AuthError::WrongPassword)
        ));
    }

    #[tokio::test]
    async fn test_signup_rejects_unknown_role_before_storage() {
        // Lazy pool: signup must fail on the role parse, before any
        // connection is attempted.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/never-connected")
            .unwrap();

        let auth = AuthService::new(&pool);
        let err = auth
            .signup("Ada", "ada@example.com", "password123", "captain")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidRole(_)));
    }
}
