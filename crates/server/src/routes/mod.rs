//! HTTP route handlers for the shipline service.
//!
//! # Route Structure
//!
//! ```text
//! # Users
//! POST /users/signup           - Register and start a session
//! POST /users/login            - Authenticate and start a session
//! POST /users/profile          - Current session user
//! POST /users/logout           - Destroy the session
//! PUT  /users/changePassword   - Rotate the session user's password
//!
//! # Ship groups
//! GET    /ship-groups                 - List all ship groups
//! GET    /ship-groups/count          - Total ship group count
//! GET    /ship-groups/{id}           - One ship group by id
//! GET    /ship-groups/tracking/{tn}  - One ship group by tracking number
//! POST   /ship-groups                - Create a ship group
//! PATCH  /ship-groups/{id}           - Merge fields into a ship group
//! DELETE /ship-groups/{id}           - Delete and return a ship group
//!
//! # Reports
//! GET /reports/recent-activity - Weekly per-route delivery counts
//! GET /reports/top-leaders     - Most frequent group leaders
//! GET /reports/top-members     - Most frequent group members
//! ```

pub mod auth;
pub mod reports;
pub mod ship_groups;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the user/auth routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/profile", post(auth::profile))
        .route("/logout", post(auth::logout))
        .route("/changePassword", put(auth::change_password))
}

/// Create the ship group routes router.
pub fn ship_group_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ship_groups::list).post(ship_groups::create))
        .route("/count", get(ship_groups::count))
        .route(
            "/tracking/{tracking_number}",
            get(ship_groups::get_by_tracking_number),
        )
        .route(
            "/{id}",
            get(ship_groups::get)
                .patch(ship_groups::update)
                .delete(ship_groups::delete),
        )
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/recent-activity", get(reports::recent_activity))
        .route("/top-leaders", get(reports::top_leaders))
        .route("/top-members", get(reports::top_members))
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/ship-groups", ship_group_routes())
        .nest("/reports", report_routes())
}
