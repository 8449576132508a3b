//! Request middleware: session layer and auth extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAuth, destroy_session, set_current_user};
pub use session::create_session_layer;
