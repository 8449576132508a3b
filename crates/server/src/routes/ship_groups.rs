//! Ship group CRUD route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shipline_core::{Email, ShipGroupId, TrackingNumber};

use crate::db::ship_groups::ShipGroupRepository;
use crate::error::{AppError, Result};
use crate::models::ship_group::{NewShipGroup, ShipGroupResponse, UpdateShipGroup};
use crate::state::AppState;

/// Create request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipGroupRequest {
    pub tracking_number: String,
    pub leader: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub ship_route: String,
    pub ship_end_date: Option<DateTime<Utc>>,
}

/// Partial-update request body; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipGroupRequest {
    pub tracking_number: Option<String>,
    pub leader: Option<String>,
    pub members: Option<Vec<String>>,
    pub ship_route: Option<String>,
    pub ship_end_date: Option<DateTime<Utc>>,
}

/// Count response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub total_ship_groups: i64,
}

fn parse_tracking_number(s: &str) -> Result<TrackingNumber> {
    TrackingNumber::parse(s).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_email(s: &str) -> Result<Email> {
    Email::parse(s).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_members(members: &[String]) -> Result<Vec<Email>> {
    members.iter().map(|m| parse_email(m)).collect()
}

/// List all ship groups.
///
/// GET /ship-groups
///
/// # Errors
///
/// 500 on persistence failure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ShipGroupResponse>>> {
    let groups = ShipGroupRepository::new(state.pool()).find_all().await?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

/// Total number of ship groups.
///
/// GET /ship-groups/count
///
/// # Errors
///
/// 500 on persistence failure.
pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let total = ShipGroupRepository::new(state.pool()).count().await?;
    Ok(Json(CountResponse {
        total_ship_groups: total,
    }))
}

/// Get one ship group by ID.
///
/// GET /ship-groups/{id}
///
/// # Errors
///
/// 404 if the id does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShipGroupResponse>> {
    let group = ShipGroupRepository::new(state.pool())
        .find_by_id(ShipGroupId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("ship group".to_owned()))?;

    Ok(Json(group.into()))
}

/// Get one ship group by tracking number.
///
/// GET /ship-groups/tracking/{trackingNumber}
///
/// # Errors
///
/// 400 for a malformed tracking number, 404 if no shipment uses it.
pub async fn get_by_tracking_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<ShipGroupResponse>> {
    let tracking_number = parse_tracking_number(&tracking_number)?;

    let group = ShipGroupRepository::new(state.pool())
        .find_by_tracking_number(&tracking_number)
        .await?
        .ok_or_else(|| AppError::NotFound("ship group".to_owned()))?;

    Ok(Json(group.into()))
}

/// Create a ship group.
///
/// POST /ship-groups
///
/// # Errors
///
/// 400 for malformed fields, 409 for a duplicate tracking number.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateShipGroupRequest>,
) -> Result<Json<ShipGroupResponse>> {
    let new_group = NewShipGroup {
        tracking_number: parse_tracking_number(&body.tracking_number)?,
        leader: parse_email(&body.leader)?,
        members: parse_members(&body.members)?,
        ship_route: body.ship_route,
        ship_end_date: body.ship_end_date,
    };

    let group = ShipGroupRepository::new(state.pool())
        .create(&new_group)
        .await?;

    tracing::info!(id = %group.id, tracking_number = %group.tracking_number, "Ship group created");
    Ok(Json(group.into()))
}

/// Merge fields into a ship group.
///
/// PATCH /ship-groups/{id}
///
/// # Errors
///
/// 400 for malformed fields, 404 if the id does not exist.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateShipGroupRequest>,
) -> Result<Json<ShipGroupResponse>> {
    let changes = UpdateShipGroup {
        tracking_number: body
            .tracking_number
            .as_deref()
            .map(parse_tracking_number)
            .transpose()?,
        leader: body.leader.as_deref().map(parse_email).transpose()?,
        members: body.members.as_deref().map(parse_members).transpose()?,
        ship_route: body.ship_route,
        ship_end_date: body.ship_end_date,
    };

    let group = ShipGroupRepository::new(state.pool())
        .update(ShipGroupId::new(id), &changes)
        .await?;

    Ok(Json(group.into()))
}

/// Delete a ship group and return the removed record.
///
/// DELETE /ship-groups/{id}
///
/// # Errors
///
/// 404 if the id does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShipGroupResponse>> {
    let group = ShipGroupRepository::new(state.pool())
        .delete(ShipGroupId::new(id))
        .await?;

    tracing::info!(id = %group.id, "Ship group deleted");
    Ok(Json(group.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_camel_case() {
        let body: CreateShipGroupRequest = serde_json::from_str(
            r#"{
                "trackingNumber": "1Z999AA10123456784",
                "leader": "lead@example.com",
                "members": ["m1@example.com", "m2@example.com"],
                "shipRoute": "air-express",
                "shipEndDate": "2026-08-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(body.tracking_number, "1Z999AA10123456784");
        assert_eq!(body.members.len(), 2);
        assert!(body.ship_end_date.is_some());
    }

    #[test]
    fn test_create_body_members_default_empty() {
        let body: CreateShipGroupRequest = serde_json::from_str(
            r#"{
                "trackingNumber": "TN-1",
                "leader": "lead@example.com",
                "shipRoute": "sea"
            }"#,
        )
        .unwrap();
        assert!(body.members.is_empty());
        assert!(body.ship_end_date.is_none());
    }

    #[test]
    fn test_update_body_absent_fields_are_none() {
        let body: UpdateShipGroupRequest =
            serde_json::from_str(r#"{"shipRoute": "rail"}"#).unwrap();
        assert_eq!(body.ship_route.as_deref(), Some("rail"));
        assert!(body.tracking_number.is_none());
        assert!(body.members.is_none());
    }

    #[test]
    fn test_parse_members_rejects_bad_email() {
        let members = vec!["good@example.com".to_owned(), "bad".to_owned()];
        assert!(parse_members(&members).is_err());
    }

    #[test]
    fn test_count_response_wire_key() {
        let value = serde_json::to_value(CountResponse {
            total_ship_groups: 12,
        })
        .unwrap();
        assert_eq!(value["totalShipGroups"], 12);
    }
}
