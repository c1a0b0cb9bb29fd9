//! Transit network model.
//!
//! The [`Graph`] is an immutable directed adjacency structure with
//! non-negative weights and optional station coordinates. It is built once
//! (by [`GraphBuilder`], [`Graph::from_adjacency`], [`load_network`] or a
//! CSV [`NetworkDirectory`]) and then only read by the planner.

mod builder;
mod dataset;
mod error;
mod graph;
mod loader;

pub use builder::GraphBuilder;
pub use dataset::{CsvEdge, CsvStation, NetworkDirectory, read_csv_network};
pub use error::GraphError;
pub use graph::{Graph, GraphStatistics, NodeIndex};
pub use loader::{EdgeRecord, LoadError, NetworkFile, StationRecord, load_network};
