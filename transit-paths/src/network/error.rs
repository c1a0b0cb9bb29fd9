//! Graph construction error types.

use crate::domain::{DomainError, StationId};

/// Errors raised while building a [`Graph`](super::Graph).
///
/// Weights are checked when edges are added, so a constructed graph can
/// never hand the planner a value that would break the non-decreasing
/// frontier of a best-first search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Edge weight is below zero
    #[error("negative edge weight {weight} on {from} -> {to}")]
    NegativeWeight {
        from: StationId,
        to: StationId,
        weight: f64,
    },

    /// Edge weight is NaN or infinite
    #[error("non-finite edge weight {weight} on {from} -> {to}")]
    InvalidWeight {
        from: StationId,
        to: StationId,
        weight: f64,
    },

    /// Invalid station id or coordinate
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    #[test]
    fn error_display() {
        let err = GraphError::NegativeWeight {
            from: id("A"),
            to: id("B"),
            weight: -1.0,
        };
        assert_eq!(err.to_string(), "negative edge weight -1 on A -> B");

        let err = GraphError::InvalidWeight {
            from: id("A"),
            to: id("B"),
            weight: f64::NAN,
        };
        assert_eq!(err.to_string(), "non-finite edge weight NaN on A -> B");

        let err = GraphError::from(DomainError::EmptyStationId);
        assert_eq!(err.to_string(), "station id must not be empty");
    }
}
