//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! shipline-cli user create -e ops@example.com -n "Ops Admin" -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `SHIPLINE_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to generic `DATABASE_URL`)

use secrecy::SecretString;
use thiserror::Error;

use shipline_core::{Email, UserRole};
use shipline_server::db::{create_pool, users::UserRepository};
use shipline_server::models::user::NewUser;
use shipline_server::services::auth;

/// Errors that can occur during user management.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: buyer, merchant, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    Email(#[from] shipline_core::EmailError),

    /// Password hashing or validation failed.
    #[error("Password error: {0}")]
    Password(String),

    /// Repository failure, including duplicate emails.
    #[error("{0}")]
    Repository(#[from] shipline_server::db::RepositoryError),
}

/// Create a new user directly in the database.
///
/// The password is hashed before storage, the same as the signup route.
///
/// # Errors
///
/// Returns `UserError` if validation fails, the database is
/// unreachable, or the email is already registered.
pub async fn create(email: &str, name: &str, password: &str, role: &str) -> Result<i32, UserError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let role: UserRole = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;

    let password_hash =
        auth::hash_password(password).map_err(|e| UserError::Password(e.to_string()))?;

    let database_url: SecretString = std::env::var("SHIPLINE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| UserError::MissingEnvVar("SHIPLINE_DATABASE_URL"))?
        .into();

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Creating user: {} ({})", email, role);
    let user = UserRepository::new(&pool)
        .create(&NewUser {
            name: name.to_owned(),
            email,
            password_hash,
            role,
            avatar: None,
        })
        .await?;

    Ok(user.id.as_i32())
}
