//! Authentication extractors and session helpers.
//!
//! Provides extractors for requiring an authenticated session in route
//! handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session::{CurrentUser, keys};

/// Extractor that requires an authenticated session.
///
/// Rejects the request with 404 when no session user exists; the API
/// contract reports a missing session as NotFound, not Unauthorized.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection returned when no authenticated session exists.
pub struct NoSessionRejection;

impl IntoResponse for NoSessionRejection {
    fn into_response(self) -> Response {
        AppError::NoSession.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = NoSessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(NoSessionRejection)?;

        let user: CurrentUser = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(NoSessionRejection)?;

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session (login/signup).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to destroy the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub async fn destroy_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
