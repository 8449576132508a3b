//! Integration tests for Shipline.
//!
//! These tests drive a running server over HTTP with a cookie-bearing
//! client, so they exercise the real path: router, session layer,
//! repositories, and the Postgres unique indexes behind them.
//!
//! # Running Tests
//!
//! ```bash
//! # Start Postgres and migrate
//! cargo run -p shipline-cli -- migrate
//!
//! # Start the server
//! cargo run -p shipline-server
//!
//! # Run integration tests
//! cargo test -p shipline-integration-tests -- --ignored
//! ```
//!
//! The server address defaults to `http://localhost:3000` and can be
//! overridden with `SHIPLINE_BASE_URL`.

use reqwest::Client;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHIPLINE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// HTTP client with a cookie store, so it carries the session cookie
/// between requests like a browser would.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A fresh email address per call, so tests never collide on the
/// unique index across runs.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4())
}
