//! Reporting route handlers.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::services::reports::{
    RecentActivityReport, ReportsService, TopLeadersReport, TopMembersReport,
};
use crate::state::AppState;

/// Deliveries per week per route over the trailing window.
///
/// GET /reports/recent-activity
///
/// # Errors
///
/// 500 on persistence failure.
pub async fn recent_activity(State(state): State<AppState>) -> Result<Json<RecentActivityReport>> {
    let report = ReportsService::new(state.pool()).recent_activity().await?;
    Ok(Json(report))
}

/// Ranked list of the most frequent group leaders.
///
/// GET /reports/top-leaders
///
/// # Errors
///
/// 500 on persistence failure.
pub async fn top_leaders(State(state): State<AppState>) -> Result<Json<TopLeadersReport>> {
    let report = ReportsService::new(state.pool()).top_leaders().await?;
    Ok(Json(report))
}

/// Ranked list of the most frequent group members.
///
/// GET /reports/top-members
///
/// # Errors
///
/// 500 on persistence failure.
pub async fn top_members(State(state): State<AppState>) -> Result<Json<TopMembersReport>> {
    let report = ReportsService::new(state.pool()).top_members().await?;
    Ok(Json(report))
}
