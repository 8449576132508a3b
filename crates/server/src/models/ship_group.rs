//! Ship group domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shipline_core::{Email, ShipGroupId, TrackingNumber};

/// A shipment batch (domain type).
///
/// Leader and members are stored as email addresses; reporting queries
/// join them against `app_user` by email.
#[derive(Debug, Clone)]
pub struct ShipGroup {
    /// Unique ship group ID.
    pub id: ShipGroupId,
    /// Carrier tracking number (unique per shipment).
    pub tracking_number: TrackingNumber,
    /// Email of the user leading the group.
    pub leader: Email,
    /// Emails of participating users.
    pub members: Vec<Email>,
    /// Route category label (e.g., "air-express").
    pub ship_route: String,
    /// When the shipment completed; `None` while still in transit.
    pub ship_end_date: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new ship group.
#[derive(Debug)]
pub struct NewShipGroup {
    pub tracking_number: TrackingNumber,
    pub leader: Email,
    pub members: Vec<Email>,
    pub ship_route: String,
    pub ship_end_date: Option<DateTime<Utc>>,
}

/// Partial update of a ship group.
///
/// `None` fields are left unchanged (shallow field-level merge, not a
/// record replacement). Clearing `ship_end_date` back to null is not
/// supported through this type.
#[derive(Debug, Default)]
pub struct UpdateShipGroup {
    pub tracking_number: Option<TrackingNumber>,
    pub leader: Option<Email>,
    pub members: Option<Vec<Email>>,
    pub ship_route: Option<String>,
    pub ship_end_date: Option<DateTime<Utc>>,
}

/// Ship group payload returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipGroupResponse {
    pub id: ShipGroupId,
    pub tracking_number: TrackingNumber,
    pub leader: Email,
    pub members: Vec<Email>,
    pub ship_route: String,
    pub ship_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShipGroup> for ShipGroupResponse {
    fn from(group: ShipGroup) -> Self {
        Self {
            id: group.id,
            tracking_number: group.tracking_number,
            leader: group.leader,
            members: group.members,
            ship_route: group.ship_route,
            ship_end_date: group.ship_end_date,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_camel_case_wire_format() {
        let group = ShipGroup {
            id: ShipGroupId::new(5),
            tracking_number: TrackingNumber::parse("1Z999AA10123456784").unwrap(),
            leader: Email::parse("lead@example.com").unwrap(),
            members: vec![Email::parse("m1@example.com").unwrap()],
            ship_route: "air-express".to_owned(),
            ship_end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value: serde_json::Value =
            serde_json::to_value(ShipGroupResponse::from(group)).unwrap();
        assert_eq!(value["trackingNumber"], "1Z999AA10123456784");
        assert_eq!(value["shipRoute"], "air-express");
        assert!(value["shipEndDate"].is_null());
        assert!(value.get("ship_route").is_none());
    }
}
