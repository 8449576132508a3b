//! Business-logic services layered over the repositories.

pub mod auth;
pub mod reports;

pub use auth::{AuthError, AuthService};
pub use reports::ReportsService;
