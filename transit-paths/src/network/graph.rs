//! Immutable weighted adjacency representation.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::Serialize;

use crate::domain::{Coordinate, StationId};

use super::builder::GraphBuilder;
use super::error::GraphError;

/// Dense handle for a station within one [`Graph`].
///
/// Indices are assigned in insertion order and are only meaningful for the
/// graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

/// A directed, non-negatively weighted transit graph.
///
/// Every station referenced by an edge is a node of the graph, even if it
/// has no outgoing edges, so per-search tables can be sized up front. The
/// graph is never mutated after [`GraphBuilder::build`]; searches borrow it
/// immutably and it can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(super) stations: Vec<StationId>,
    pub(super) lookup: HashMap<StationId, NodeIndex>,
    pub(super) coordinates: Vec<Option<Coordinate>>,
    pub(super) outgoing: Vec<Vec<(NodeIndex, f64)>>,
    pub(super) incoming: Vec<Vec<(NodeIndex, f64)>>,
    pub(super) edge_count: usize,
    pub(super) fingerprint: u64,
}

/// Summary counts for a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub nodes: usize,
    pub edges: usize,
    /// Outgoing edges per station; zero for an empty graph.
    pub average_degree: f64,
    pub stations_with_coordinates: usize,
}

impl Graph {
    /// Start building a graph.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Build a graph from adjacency lists.
    ///
    /// Each entry is a station and its outgoing `(neighbor, weight)` edges.
    /// Stations only mentioned as neighbors are added too.
    ///
    /// # Example
    ///
    /// ```
    /// use transit_paths::network::Graph;
    ///
    /// let graph = Graph::from_adjacency([
    ///     ("A", vec![("B", 1.0)]),
    ///     ("B", vec![("C", 2.0)]),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(graph.node_count(), 3);
    /// assert_eq!(graph.edge_count(), 2);
    ///
    /// // Negative weights are rejected
    /// assert!(Graph::from_adjacency([("A", vec![("B", -1.0)])]).is_err());
    /// ```
    pub fn from_adjacency<'s, I, E>(adjacency: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (&'s str, E)>,
        E: IntoIterator<Item = (&'s str, f64)>,
    {
        let mut builder = GraphBuilder::new();
        for (station, edges) in adjacency {
            let from = StationId::parse(station)?;
            builder.add_station(from.clone());
            for (neighbor, weight) in edges {
                let to = StationId::parse(neighbor)?;
                builder.add_edge(from.clone(), to, weight)?;
            }
        }
        Ok(builder.build())
    }

    /// Number of stations.
    pub fn node_count(&self) -> usize {
        self.stations.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Node count, edge count and average out-degree.
    pub fn statistics(&self) -> GraphStatistics {
        let nodes = self.node_count();
        let average_degree = if nodes == 0 {
            0.0
        } else {
            self.edge_count as f64 / nodes as f64
        };
        GraphStatistics {
            nodes,
            edges: self.edge_count,
            average_degree,
            stations_with_coordinates: self.coordinate_count(),
        }
    }

    /// Hash of the station order and every weighted edge.
    ///
    /// Two graphs with the same fingerprint have the same shortest-path
    /// distances, so data derived from one (such as a landmark table) is
    /// valid for the other. Coordinates are not included.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub(super) fn compute_fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.stations.hash(&mut hasher);
        for edges in &self.outgoing {
            edges.len().hash(&mut hasher);
            for &(to, weight) in edges {
                to.hash(&mut hasher);
                weight.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    /// Returns true if the graph has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Iterate over all station ids in index order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &StationId> + '_ {
        self.stations.iter()
    }

    /// Iterate over all node indices.
    pub fn indices(&self) -> impl ExactSizeIterator<Item = NodeIndex> + use<> {
        (0..self.stations.len()).map(NodeIndex)
    }

    /// Look up the index of a station.
    pub fn index_of(&self, station: &StationId) -> Option<NodeIndex> {
        self.lookup.get(station).copied()
    }

    /// Returns true if the station is a node of this graph.
    pub fn contains(&self, station: &StationId) -> bool {
        self.lookup.contains_key(station)
    }

    /// The station id for an index.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this graph.
    pub fn station(&self, node: NodeIndex) -> &StationId {
        &self.stations[node.0]
    }

    /// The coordinate of a station, if known.
    pub fn coordinate(&self, node: NodeIndex) -> Option<Coordinate> {
        self.coordinates.get(node.0).copied().flatten()
    }

    /// Number of stations that carry a coordinate.
    pub fn coordinate_count(&self) -> usize {
        self.coordinates.iter().filter(|c| c.is_some()).count()
    }

    /// Outgoing `(neighbor, weight)` edges, in insertion order.
    pub fn neighbors(&self, node: NodeIndex) -> &[(NodeIndex, f64)] {
        &self.outgoing[node.0]
    }

    /// Incoming `(predecessor, weight)` edges, in insertion order.
    pub fn incoming(&self, node: NodeIndex) -> &[(NodeIndex, f64)] {
        &self.incoming[node.0]
    }

    /// Outgoing edges of a station by id.
    ///
    /// Returns an empty list for unknown stations.
    pub fn neighbors_of(&self, station: &StationId) -> Vec<(StationId, f64)> {
        match self.index_of(station) {
            Some(node) => self
                .neighbors(node)
                .iter()
                .map(|&(n, w)| (self.station(n).clone(), w))
                .collect(),
            None => Vec::new(),
        }
    }
}
