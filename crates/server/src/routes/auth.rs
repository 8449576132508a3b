//! Authentication route handlers.
//!
//! JSON endpoints for signup, login, profile, logout, and password change.
//! Status codes follow the documented contract: a missing session is 404,
//! a wrong password is 401, a duplicate email is 409.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, destroy_session, set_current_user};
use crate::models::session::CurrentUser;
use crate::models::user::UserResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Change-password request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Register a new account and establish a session.
///
/// POST /users/signup
///
/// # Errors
///
/// 400 for an unknown role or invalid email, 409 if the email is taken,
/// 500 on persistence failure.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SignupRequest>,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .signup(&body.name, &body.email, &body.password, &body.role)
        .await?;

    let snapshot = CurrentUser::from(user.clone());
    set_current_user(&session, &snapshot)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed up");
    Ok(Json(user.into()))
}

/// Authenticate with email and password and establish a session.
///
/// POST /users/login
///
/// # Errors
///
/// 404 if no account uses the email, 401 on a wrong password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let snapshot = CurrentUser::from(user.clone());
    set_current_user(&session, &snapshot)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(user.into()))
}

/// Return the session's user snapshot.
///
/// POST /users/profile
///
/// The snapshot is returned verbatim; it can be stale if the underlying
/// record changed since login.
///
/// # Errors
///
/// 404 when no session exists.
pub async fn profile(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

/// Destroy the session unconditionally.
///
/// POST /users/logout
///
/// Always answers 200: the contract documents no failure codes for
/// logout, so a store error is logged and the cookie-bearing session is
/// still considered gone from the client's point of view.
pub async fn logout(session: Session) -> StatusCode {
    if let Err(e) = destroy_session(&session).await {
        tracing::error!(error = %e, "Failed to destroy session on logout");
    }
    StatusCode::OK
}

/// Change the session user's password.
///
/// PUT /users/changePassword
///
/// The old-password check runs against the hash currently stored in the
/// database, never the session snapshot.
///
/// # Errors
///
/// 404 when no session exists, 401 on a wrong old password.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool());
    auth.change_password(user.id, &body.old_password, &body.new_password)
        .await?;

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(Json(json!({ "message": "Password updated successfully" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shipline_core::UserRole;

    use super::*;

    #[test]
    fn test_change_password_body_is_camel_case() {
        let body: ChangePasswordRequest =
            serde_json::from_str(r#"{"oldPassword": "old-secret", "newPassword": "new-secret"}"#)
                .unwrap();
        assert_eq!(body.old_password, "old-secret");
        assert_eq!(body.new_password, "new-secret");
    }

    #[test]
    fn test_signup_body_roundtrip() {
        let body: SignupRequest = serde_json::from_str(
            r#"{"name": "Ada", "email": "ada@example.com", "password": "pw12345678", "role": "buyer"}"#,
        )
        .unwrap();
        assert_eq!(body.role, "buyer");
        assert!(body.role.parse::<UserRole>().is_ok());
    }
}
