//! Ship group repository for database operations.
//!
//! CRUD over the `ship_group` table plus the grouped rows backing the
//! reporting queries. Aggregation happens in SQL; shaping the grouped
//! rows into report payloads lives in `services::reports`.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use shipline_core::{Email, ShipGroupId, TrackingNumber};

use super::RepositoryError;
use crate::models::ship_group::{NewShipGroup, ShipGroup, UpdateShipGroup};

/// Reporting window: the last 7 completed weeks.
pub const ACTIVITY_WINDOW_DAYS: i64 = 49;

/// How many top shippers a leaderboard returns.
pub const LEADERBOARD_SIZE: i64 = 5;

/// Raw row shape; converted to the domain type at the repository boundary.
#[derive(sqlx::FromRow)]
struct ShipGroupRow {
    id: i32,
    tracking_number: String,
    leader: String,
    members: Vec<String>,
    ship_route: String,
    ship_end_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShipGroupRow {
    fn into_ship_group(self) -> Result<ShipGroup, RepositoryError> {
        let tracking_number = TrackingNumber::parse(&self.tracking_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tracking number in database: {e}"))
        })?;
        let leader = Email::parse(&self.leader).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid leader email in database: {e}"))
        })?;
        let members = self
            .members
            .iter()
            .map(|m| {
                Email::parse(m).map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid member email in database: {e}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ShipGroup {
            id: ShipGroupId::new(self.id),
            tracking_number,
            leader,
            members,
            ship_route: self.ship_route,
            ship_end_date: self.ship_end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// One (week, route) bucket of completed shipments.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ActivityBucket {
    /// Whole weeks between "now" and the completion date; 0 = most recent.
    pub weeks_ago: i64,
    /// Route label of the bucketed shipments.
    pub ship_route: String,
    /// Number of shipments in the bucket.
    pub amount: i64,
}

/// One grouped-and-joined leaderboard row, before rank annotation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShipperCount {
    /// Email the shipments were grouped by.
    pub email: String,
    /// Display name from the joined user record.
    pub name: String,
    /// Avatar from the joined user record.
    pub avatar: Option<String>,
    /// Number of shipments attributed to this user.
    pub amount: i64,
}

const SHIP_GROUP_COLUMNS: &str =
    "id, tracking_number, leader, members, ship_route, ship_end_date, created_at, updated_at";

/// Repository for ship group database operations.
pub struct ShipGroupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShipGroupRepository<'a> {
    /// Create a new ship group repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get all ship groups, in database-native order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn find_all(&self) -> Result<Vec<ShipGroup>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShipGroupRow>(&format!(
            "SELECT {SHIP_GROUP_COLUMNS} FROM ship_group"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ShipGroupRow::into_ship_group).collect()
    }

    /// Get a ship group by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ShipGroupId) -> Result<Option<ShipGroup>, RepositoryError> {
        let row = sqlx::query_as::<_, ShipGroupRow>(&format!(
            "SELECT {SHIP_GROUP_COLUMNS} FROM ship_group WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ShipGroupRow::into_ship_group).transpose()
    }

    /// Get a ship group by its tracking number.
    ///
    /// The unique index guarantees at most one match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<ShipGroup>, RepositoryError> {
        let row = sqlx::query_as::<_, ShipGroupRow>(&format!(
            "SELECT {SHIP_GROUP_COLUMNS} FROM ship_group WHERE tracking_number = $1"
        ))
        .bind(tracking_number)
        .fetch_optional(self.pool)
        .await?;

        row.map(ShipGroupRow::into_ship_group).transpose()
    }

    /// Insert a new ship group and return the persisted record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the tracking number already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_group: &NewShipGroup) -> Result<ShipGroup, RepositoryError> {
        let members: Vec<String> = new_group
            .members
            .iter()
            .map(|m| m.as_str().to_owned())
            .collect();

        let row = sqlx::query_as::<_, ShipGroupRow>(&format!(
            r"
            INSERT INTO ship_group (tracking_number, leader, members, ship_route, ship_end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SHIP_GROUP_COLUMNS}
            "
        ))
        .bind(&new_group.tracking_number)
        .bind(&new_group.leader)
        .bind(&members)
        .bind(&new_group.ship_route)
        .bind(new_group.ship_end_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("tracking number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_ship_group()
    }

    /// Merge the given fields into an existing ship group.
    ///
    /// `None` fields are left unchanged. Returns the post-update record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    /// Returns `RepositoryError::Conflict` on a duplicate tracking number.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ShipGroupId,
        changes: &UpdateShipGroup,
    ) -> Result<ShipGroup, RepositoryError> {
        let members: Option<Vec<String>> = changes
            .members
            .as_ref()
            .map(|m| m.iter().map(|e| e.as_str().to_owned()).collect());

        let row = sqlx::query_as::<_, ShipGroupRow>(&format!(
            r"
            UPDATE ship_group SET
                tracking_number = COALESCE($2, tracking_number),
                leader = COALESCE($3, leader),
                members = COALESCE($4, members),
                ship_route = COALESCE($5, ship_route),
                ship_end_date = COALESCE($6, ship_end_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SHIP_GROUP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&changes.tracking_number)
        .bind(&changes.leader)
        .bind(&members)
        .bind(&changes.ship_route)
        .bind(changes.ship_end_date)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("tracking number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.ok_or(RepositoryError::NotFound)?.into_ship_group()
    }

    /// Delete a ship group and return the removed record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ShipGroupId) -> Result<ShipGroup, RepositoryError> {
        let row = sqlx::query_as::<_, ShipGroupRow>(&format!(
            "DELETE FROM ship_group WHERE id = $1 RETURNING {SHIP_GROUP_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_ship_group()
    }

    /// Total number of ship groups.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ship_group")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }

    /// Completed shipments from the last 7 weeks, grouped by
    /// (week-index, route).
    ///
    /// Week index is floor((now - completion) / 7 days); 0 is the most
    /// recent week. Weeks with no completions simply produce no rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_activity_buckets(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActivityBucket>, RepositoryError> {
        let window_start = now - Duration::days(ACTIVITY_WINDOW_DAYS);

        let rows = sqlx::query_as::<_, ActivityBucket>(
            r"
            SELECT floor(extract(epoch FROM ($1 - ship_end_date)) / 604800.0)::bigint AS weeks_ago,
                   ship_route,
                   COUNT(*) AS amount
            FROM ship_group
            WHERE ship_end_date IS NOT NULL
              AND ship_end_date >= $2
              AND ship_end_date <= $1
            GROUP BY weeks_ago, ship_route
            ",
        )
        .bind(now)
        .bind(window_start)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Shipment counts per leader, highest first, joined with the
    /// leader's user record. Ties break on email ascending so the
    /// leaderboard is deterministic.
    ///
    /// The top-5 cut happens before the user join: an email with no
    /// matching user record consumes its slot and then drops, shrinking
    /// the list below 5 instead of promoting the sixth email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_leaders(&self) -> Result<Vec<ShipperCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShipperCount>(
            r"
            SELECT t.email, u.name, u.avatar, t.amount
            FROM (
                SELECT leader AS email, COUNT(*) AS amount
                FROM ship_group
                GROUP BY leader
                ORDER BY amount DESC, email ASC
                LIMIT $1
            ) t
            JOIN app_user u ON u.email = t.email
            ORDER BY t.amount DESC, t.email ASC
            ",
        )
        .bind(LEADERBOARD_SIZE)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Shipment counts per member (after flattening the members array),
    /// highest first, joined with each member's user record. The top-5
    /// cut happens before the user join, as in [`Self::top_leaders`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_members(&self) -> Result<Vec<ShipperCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShipperCount>(
            r"
            SELECT t.email, u.name, u.avatar, t.amount
            FROM (
                SELECT m.email AS email, COUNT(*) AS amount
                FROM ship_group g
                CROSS JOIN LATERAL unnest(g.members) AS m(email)
                GROUP BY m.email
                ORDER BY amount DESC, email ASC
                LIMIT $1
            ) t
            JOIN app_user u ON u.email = t.email
            ORDER BY t.amount DESC, t.email ASC
            ",
        )
        .bind(LEADERBOARD_SIZE)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
