//! Account roles.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid user role: {0}. Valid roles: buyer, merchant, admin")]
pub struct UserRoleError(pub String);

/// Account role for a user.
///
/// All accounts live in a single table with a role discriminant column;
/// the role decides what a user may do, not where their record is stored.
/// Stored as lowercase text in Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Places orders and joins ship groups as a member.
    Buyer,
    /// Sells goods and typically leads ship groups.
    Merchant,
    /// Full access to user and shipment management.
    Admin,
}

impl UserRole {
    /// Role name as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Merchant => "merchant",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = UserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "merchant" => Ok(Self::Merchant),
            "admin" => Ok(Self::Admin),
            other => Err(UserRoleError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature): roles are plain TEXT columns.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserRole {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_roles() {
        assert_eq!("buyer".parse::<UserRole>().unwrap(), UserRole::Buyer);
        assert_eq!("merchant".parse::<UserRole>().unwrap(), UserRole::Merchant);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    }

    #[test]
    fn test_parse_invalid_role() {
        let err = "superuser".parse::<UserRole>().unwrap_err();
        assert!(err.to_string().contains("superuser"));
    }

    #[test]
    fn test_display_roundtrip() {
        for role in [UserRole::Buyer, UserRole::Merchant, UserRole::Admin] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&UserRole::Merchant).unwrap();
        assert_eq!(json, "\"merchant\"");

        let parsed: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, UserRole::Admin);
    }
}
