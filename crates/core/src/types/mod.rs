//! Shared domain types.

pub mod email;
pub mod id;
pub mod role;
pub mod tracking;

pub use email::{Email, EmailError};
pub use id::{ShipGroupId, UserId};
pub use role::{UserRole, UserRoleError};
pub use tracking::{TrackingNumber, TrackingNumberError};
