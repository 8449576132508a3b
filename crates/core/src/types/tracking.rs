//! Shipment tracking number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TrackingNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TrackingNumberError {
    /// The input string is empty.
    #[error("tracking number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("tracking number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains characters outside `[A-Za-z0-9_-]`.
    #[error("tracking number contains invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// A carrier tracking number.
///
/// Uniquely identifies a ship group; the database enforces uniqueness
/// with an index. Carriers use alphanumeric codes with optional dashes
/// and underscores, so that is all we accept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Maximum length of a tracking number.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `TrackingNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 64 characters,
    /// or contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, TrackingNumberError> {
        if s.is_empty() {
            return Err(TrackingNumberError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(TrackingNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(TrackingNumberError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the tracking number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TrackingNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TrackingNumber {
    type Err = TrackingNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TrackingNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TrackingNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TrackingNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(TrackingNumber::parse("1Z999AA10123456784").is_ok());
        assert!(TrackingNumber::parse("SF-2024_0042").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            TrackingNumber::parse(""),
            Err(TrackingNumberError::Empty)
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "A".repeat(65);
        assert!(matches!(
            TrackingNumber::parse(&long),
            Err(TrackingNumberError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            TrackingNumber::parse("AB 123"),
            Err(TrackingNumberError::InvalidCharacter(' '))
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let tn = TrackingNumber::parse("1Z999AA10123456784").unwrap();
        let json = serde_json::to_string(&tn).unwrap();
        assert_eq!(json, "\"1Z999AA10123456784\"");
    }
}
