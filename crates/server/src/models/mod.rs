//! Domain models and wire payloads.

pub mod session;
pub mod ship_group;
pub mod user;

pub use session::CurrentUser;
pub use ship_group::{NewShipGroup, ShipGroup, ShipGroupResponse, UpdateShipGroup};
pub use user::{NewUser, User, UserResponse};
