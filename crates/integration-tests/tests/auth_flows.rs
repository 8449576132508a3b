//! End-to-end authentication flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated via `shipline-cli migrate`
//! - The server running (cargo run -p shipline-server)
//!
//! Run with: cargo test -p shipline-integration-tests -- --ignored

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

use shipline_integration_tests::{base_url, client, unique_email};

const PASSWORD: &str = "orig-password-1";

async fn signup(client: &Client, email: &str, password: &str, role: &str) -> Response {
    client
        .post(format!("{}/users/signup", base_url()))
        .json(&json!({
            "name": "Integration Tester",
            "email": email,
            "password": password,
            "role": role,
        }))
        .send()
        .await
        .expect("signup request failed")
}

async fn login(client: &Client, email: &str, password: &str) -> Response {
    client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed")
}

async fn profile(client: &Client) -> Response {
    client
        .post(format!("{}/users/profile", base_url()))
        .send()
        .await
        .expect("profile request failed")
}

async fn logout(client: &Client) -> Response {
    client
        .post(format!("{}/users/logout", base_url()))
        .send()
        .await
        .expect("logout request failed")
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_signup_establishes_session_and_hides_credentials() {
    let c = client();
    let email = unique_email("signup");

    let resp = signup(&c, &email, PASSWORD, "buyer").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("signup body");
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "buyer");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    // The signup response carried a session cookie
    assert_eq!(profile(&c).await.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_signup_duplicate_email_is_conflict() {
    let email = unique_email("dup");

    assert_eq!(
        signup(&client(), &email, PASSWORD, "buyer").await.status(),
        StatusCode::OK
    );

    // Second signup races into the unique index, whatever the role
    let resp = signup(&client(), &email, PASSWORD, "merchant").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.expect("conflict body");
    assert_eq!(body["message"], "User with same email already exists");
}

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_signup_unknown_role_is_bad_request() {
    let resp = signup(&client(), &unique_email("role"), PASSWORD, "captain").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_login_succeeds_iff_password_verifies() {
    let email = unique_email("login");
    signup(&client(), &email, PASSWORD, "buyer").await;

    let resp = login(&client(), &email, "wrong-password-1").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("login error body");
    assert_eq!(body["message"], "Wrong password");

    assert_eq!(
        login(&client(), &email, PASSWORD).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_login_unknown_email_is_not_found() {
    let resp = login(&client(), &unique_email("ghost"), PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("login error body");
    assert_eq!(body["message"], "User does not exist");
}

// ============================================================================
// Change password
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_change_password_invalidates_old_credential() {
    let c = client();
    let email = unique_email("rotate");
    signup(&c, &email, PASSWORD, "buyer").await;

    let resp = c
        .put(format!("{}/users/changePassword", base_url()))
        .json(&json!({ "oldPassword": PASSWORD, "newPassword": "next-password-2" }))
        .send()
        .await
        .expect("change password request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("change password body");
    assert_eq!(body["message"], "Password updated successfully");

    assert_eq!(
        login(&client(), &email, PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&client(), &email, "next-password-2").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_change_password_twice_in_one_session() {
    // The old-password check must read the current hash, not a snapshot
    // taken at login.
    let c = client();
    let email = unique_email("rotate-twice");
    signup(&c, &email, PASSWORD, "buyer").await;

    let first = c
        .put(format!("{}/users/changePassword", base_url()))
        .json(&json!({ "oldPassword": PASSWORD, "newPassword": "next-password-2" }))
        .send()
        .await
        .expect("first change failed");
    assert_eq!(first.status(), StatusCode::OK);

    let second = c
        .put(format!("{}/users/changePassword", base_url()))
        .json(&json!({ "oldPassword": "next-password-2", "newPassword": "next-password-3" }))
        .send()
        .await
        .expect("second change failed");
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(
        login(&client(), &email, "next-password-3").await.status(),
        StatusCode::OK
    );
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_logout_then_profile_is_not_found() {
    let c = client();
    let email = unique_email("logout");
    signup(&c, &email, PASSWORD, "buyer").await;

    assert_eq!(profile(&c).await.status(), StatusCode::OK);
    assert_eq!(logout(&c).await.status(), StatusCode::OK);
    assert_eq!(profile(&c).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_logout_without_session_is_ok() {
    // Logout has no failure codes; a cookie-less client still gets 200.
    assert_eq!(logout(&client()).await.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and Postgres"]
async fn test_profile_without_session_is_not_found() {
    assert_eq!(profile(&client()).await.status(), StatusCode::NOT_FOUND);
}
