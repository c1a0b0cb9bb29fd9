//! Domain types for transit shortest-path search.
//!
//! This module contains the validated value types shared by the network
//! model and the planner. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod coordinate;
mod error;
mod station;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM};
pub use error::DomainError;
pub use station::StationId;
