//! Station identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// An opaque, non-empty station identifier.
///
/// Identifiers are compared exactly (no case folding or trimming). The
/// graph interns them into dense indices, so this type only appears at the
/// API boundary.
///
/// # Examples
///
/// ```
/// use transit_paths::domain::StationId;
///
/// let kgx = StationId::parse("KGX").unwrap();
/// assert_eq!(kgx.as_str(), "KGX");
///
/// // Empty identifiers are rejected
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier.
    ///
    /// Any non-empty string without surrounding whitespace is accepted.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.is_empty() {
            return Err(DomainError::EmptyStationId);
        }
        if s.trim() != s {
            return Err(DomainError::PaddedStationId(s.to_string()));
        }
        Ok(StationId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("A").is_ok());
        assert!(StationId::parse("KGX").is_ok());
        assert!(StationId::parse("place-north-station").is_ok());
        assert!(StationId::parse("Gare du Nord").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(matches!(
            StationId::parse(""),
            Err(DomainError::EmptyStationId)
        ));
    }

    #[test]
    fn reject_padding() {
        assert!(StationId::parse(" A").is_err());
        assert!(StationId::parse("A ").is_err());
        assert!(StationId::parse("\tA").is_err());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("PAD").unwrap();
        assert_eq!(format!("{}", id), "PAD");
        assert_eq!(format!("{:?}", id), "StationId(PAD)");
    }

    #[test]
    fn serde_rejects_empty() {
        let ok: Result<StationId, _> = serde_json::from_str("\"EUS\"");
        assert_eq!(ok.unwrap().as_str(), "EUS");

        let err: Result<StationId, _> = serde_json::from_str("\"\"");
        assert!(err.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parse then as_str returns the input
        #[test]
        fn roundtrip(s in "[A-Za-z0-9][A-Za-z0-9 _-]{0,15}[A-Za-z0-9]") {
            let id = StationId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Leading whitespace is always rejected
        #[test]
        fn leading_whitespace_rejected(s in "[ \t]{1,3}[A-Z]{1,5}") {
            prop_assert!(StationId::parse(&s).is_err());
        }
    }
}
