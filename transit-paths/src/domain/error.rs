//! Domain error types.
//!
//! These errors represent validation failures for station identifiers and
//! coordinates. They are distinct from graph and search errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Station identifier is the empty string
    #[error("station id must not be empty")]
    EmptyStationId,

    /// Station identifier has leading or trailing whitespace
    #[error("station id {0:?} has surrounding whitespace")]
    PaddedStationId(String),

    /// Latitude or longitude out of range or not finite
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}
