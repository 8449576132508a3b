//! Reporting over completed shipments.
//!
//! The repository runs the SQL grouping; this module shapes grouped rows
//! into the wire payloads: the per-week route breakdown and the ranked
//! top-5 leaderboards.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use crate::db::RepositoryError;
use crate::db::ship_groups::{ActivityBucket, ShipGroupRepository, ShipperCount};

/// Route-to-count mapping for a single week.
pub type RouteCounts = BTreeMap<String, i64>;

/// Recent shipment activity payload.
///
/// Keys are week indexes as strings ("0" = most recent week). Weeks with
/// no completed shipments are absent rather than present-but-empty.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityReport {
    pub recent_activity: BTreeMap<String, RouteCounts>,
}

/// A leaderboard entry annotated with its 1-based rank label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedShipper {
    /// "Top 1" through "Top 5".
    pub rank: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub amount: i64,
}

/// Top-5 leaders payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLeadersReport {
    pub top_five_leaders: Vec<RankedShipper>,
}

/// Top-5 members payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMembersReport {
    pub top_five_members: Vec<RankedShipper>,
}

/// Reporting service over the ship group repository.
pub struct ReportsService<'a> {
    groups: ShipGroupRepository<'a>,
}

impl<'a> ReportsService<'a> {
    /// Create a new reports service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            groups: ShipGroupRepository::new(pool),
        }
    }

    /// Per-week, per-route counts of shipments completed in the last
    /// 7 weeks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_activity(&self) -> Result<RecentActivityReport, RepositoryError> {
        let buckets = self.groups.recent_activity_buckets(Utc::now()).await?;
        Ok(RecentActivityReport {
            recent_activity: fold_activity_buckets(buckets),
        })
    }

    /// The five leaders with the most shipments, ranked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_leaders(&self) -> Result<TopLeadersReport, RepositoryError> {
        let rows = self.groups.top_leaders().await?;
        Ok(TopLeadersReport {
            top_five_leaders: rank_shippers(rows),
        })
    }

    /// The five members with the most shipments, ranked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_members(&self) -> Result<TopMembersReport, RepositoryError> {
        let rows = self.groups.top_members().await?;
        Ok(TopMembersReport {
            top_five_members: rank_shippers(rows),
        })
    }
}

/// Fold (week, route, count) buckets into the nested week -> route -> count
/// map. Weeks that produced no buckets never appear as keys.
fn fold_activity_buckets(buckets: Vec<ActivityBucket>) -> BTreeMap<String, RouteCounts> {
    buckets.into_iter().fold(BTreeMap::new(), |mut acc, bucket| {
        acc.entry(bucket.weeks_ago.to_string())
            .or_default()
            .insert(bucket.ship_route, bucket.amount);
        acc
    })
}

/// Attach "Top N" labels to rows already sorted by the query
/// (count descending, email ascending on ties).
fn rank_shippers(rows: Vec<ShipperCount>) -> Vec<RankedShipper> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| RankedShipper {
            rank: format!("Top {}", index + 1),
            email: row.email,
            name: row.name,
            avatar: row.avatar,
            amount: row.amount,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bucket(weeks_ago: i64, route: &str, amount: i64) -> ActivityBucket {
        ActivityBucket {
            weeks_ago,
            ship_route: route.to_owned(),
            amount,
        }
    }

    fn shipper(email: &str, amount: i64) -> ShipperCount {
        ShipperCount {
            email: email.to_owned(),
            name: format!("name-{email}"),
            avatar: Some(format!("https://example.com/{email}.png")),
            amount,
        }
    }

    #[test]
    fn test_fold_groups_routes_under_week_keys() {
        let folded = fold_activity_buckets(vec![
            bucket(0, "A", 1),
            bucket(1, "B", 1),
            bucket(1, "A", 2),
        ]);

        assert_eq!(folded.len(), 2);
        assert_eq!(folded["0"].get("A"), Some(&1));
        assert_eq!(folded["1"].get("A"), Some(&2));
        assert_eq!(folded["1"].get("B"), Some(&1));
    }

    #[test]
    fn test_fold_omits_weeks_with_no_matches() {
        // Buckets only for weeks 0 and 2: week 1 must be absent entirely,
        // not present with an empty map.
        let folded = fold_activity_buckets(vec![bucket(0, "A", 1), bucket(2, "C", 4)]);

        assert!(folded.contains_key("0"));
        assert!(!folded.contains_key("1"));
        assert!(folded.contains_key("2"));
    }

    #[test]
    fn test_fold_empty_input_yields_empty_map() {
        assert!(fold_activity_buckets(vec![]).is_empty());
    }

    #[test]
    fn test_recent_activity_serializes_string_week_keys() {
        let report = RecentActivityReport {
            recent_activity: fold_activity_buckets(vec![bucket(0, "A", 1), bucket(1, "B", 1)]),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["recentActivity"]["0"]["A"], 1);
        assert_eq!(value["recentActivity"]["1"]["B"], 1);
        assert!(value["recentActivity"].get("2").is_none());
    }

    #[test]
    fn test_rank_labels_are_one_based_in_order() {
        let ranked = rank_shippers(vec![
            shipper("a@example.com", 10),
            shipper("b@example.com", 9),
            shipper("c@example.com", 8),
            shipper("d@example.com", 7),
            shipper("e@example.com", 6),
        ]);

        let labels: Vec<&str> = ranked.iter().map(|r| r.rank.as_str()).collect();
        assert_eq!(labels, ["Top 1", "Top 2", "Top 3", "Top 4", "Top 5"]);
        assert_eq!(ranked[0].email, "a@example.com");
        assert_eq!(ranked[0].amount, 10);
        assert_eq!(ranked[0].name, "name-a@example.com");
    }

    #[test]
    fn test_rank_preserves_joined_user_fields() {
        let ranked = rank_shippers(vec![shipper("lead@example.com", 3)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(
            ranked[0].avatar.as_deref(),
            Some("https://example.com/lead@example.com.png")
        );
    }

    #[test]
    fn test_rank_empty_input() {
        assert!(rank_shippers(vec![]).is_empty());
    }

    #[test]
    fn test_rank_short_list_stays_short() {
        // The query may return fewer than 5 rows when a top-slot email
        // has no user record; ranks stay contiguous and nothing is
        // backfilled.
        let ranked = rank_shippers(vec![
            shipper("b@example.com", 9),
            shipper("c@example.com", 8),
            shipper("d@example.com", 7),
            shipper("e@example.com", 6),
        ]);

        assert_eq!(ranked.len(), 4);
        let labels: Vec<&str> = ranked.iter().map(|r| r.rank.as_str()).collect();
        assert_eq!(labels, ["Top 1", "Top 2", "Top 3", "Top 4"]);
    }
}
