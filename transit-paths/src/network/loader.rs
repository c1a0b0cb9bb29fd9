//! JSON network file loading.
//!
//! A network file lists stations (with optional coordinates) and edges:
//!
//! ```json
//! {
//!   "stations": [{ "id": "A", "name": "Alpha", "lat": 51.5, "lon": -0.12 }],
//!   "edges": [{ "from": "A", "to": "B", "weight": 3.0, "bidirectional": true }]
//! }
//! ```
//!
//! Edges are bidirectional unless stated otherwise.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Coordinate, StationId};

use super::builder::GraphBuilder;
use super::error::GraphError;
use super::graph::Graph;

/// Errors that can occur when loading a network.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid network document
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV row could not be read or decoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Stations or edges file is missing from a network directory
    #[error("graph files not found for {0}")]
    MissingGraph(String),

    /// Contents describe an invalid graph
    #[error("invalid network: {0}")]
    Graph(#[from] GraphError),
}

/// A station record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: StationId,

    /// Display name, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// An edge record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: StationId,
    pub to: StationId,

    /// Travel cost (minutes, hops, ...)
    pub weight: f64,

    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

fn default_bidirectional() -> bool {
    true
}

/// On-disk representation of a transit network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    #[serde(default)]
    pub stations: Vec<StationRecord>,

    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl NetworkFile {
    /// Parse a network document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build the graph described by this document.
    ///
    /// Stations are indexed in file order, then any station only mentioned
    /// by an edge. A station needs both `lat` and `lon` to get a coordinate.
    pub fn into_graph(self) -> Result<Graph, LoadError> {
        let mut builder = GraphBuilder::new();

        for station in self.stations {
            match (station.lat, station.lon) {
                (Some(lat), Some(lon)) => {
                    let coordinate = Coordinate::new(lat, lon).map_err(GraphError::from)?;
                    builder.set_coordinate(station.id, coordinate);
                }
                _ => {
                    builder.add_station(station.id);
                }
            }
        }

        for edge in self.edges {
            if edge.bidirectional {
                builder.add_bidirectional(edge.from, edge.to, edge.weight)?;
            } else {
                builder.add_edge(edge.from, edge.to, edge.weight)?;
            }
        }

        Ok(builder.build())
    }
}

/// Load a graph from a JSON network file.
pub fn load_network(path: impl AsRef<Path>) -> Result<Graph, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let graph = NetworkFile::from_reader(BufReader::new(file))?.into_graph()?;

    debug!(
        path = %path.display(),
        stations = graph.node_count(),
        edges = graph.edge_count(),
        with_coordinates = graph.coordinate_count(),
        "Loaded network"
    );

    Ok(graph)
}
