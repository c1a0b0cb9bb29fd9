//! Builder for [`Graph`].

use std::collections::hash_map::Entry;

use crate::domain::{Coordinate, StationId};

use super::error::GraphError;
use super::graph::{Graph, NodeIndex};

/// Incrementally assembles a [`Graph`].
///
/// Edge weights are validated as they are added. Bidirectional edges are
/// stored as two directed edges with the same weight; the finished graph
/// carries no notion of directionality beyond its adjacency lists.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    inner: Graph,
}

impl GraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a station if it is not already present.
    ///
    /// Returns the station's index either way.
    pub fn add_station(&mut self, station: StationId) -> NodeIndex {
        let next = NodeIndex(self.inner.stations.len());
        match self.inner.lookup.entry(station) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                self.inner.stations.push(e.key().clone());
                self.inner.coordinates.push(None);
                self.inner.outgoing.push(Vec::new());
                self.inner.incoming.push(Vec::new());
                e.insert(next);
                next
            }
        }
    }

    /// Attach a coordinate to a station, adding the station if needed.
    ///
    /// A later call replaces an earlier coordinate.
    pub fn set_coordinate(&mut self, station: StationId, coordinate: Coordinate) -> NodeIndex {
        let node = self.add_station(station);
        self.inner.coordinates[node.0] = Some(coordinate);
        node
    }

    /// Add a directed edge `from -> to`.
    ///
    /// Both stations are added if needed. Parallel edges are kept; the
    /// search relaxes each of them and the cheapest one wins.
    pub fn add_edge(
        &mut self,
        from: StationId,
        to: StationId,
        weight: f64,
    ) -> Result<(), GraphError> {
        check_weight(&from, &to, weight)?;
        let f = self.add_station(from);
        let t = self.add_station(to);
        self.inner.outgoing[f.0].push((t, weight));
        self.inner.incoming[t.0].push((f, weight));
        self.inner.edge_count += 1;
        Ok(())
    }

    /// Add edges `from -> to` and `to -> from` with the same weight.
    pub fn add_bidirectional(
        &mut self,
        from: StationId,
        to: StationId,
        weight: f64,
    ) -> Result<(), GraphError> {
        check_weight(&from, &to, weight)?;
        self.add_edge(from.clone(), to.clone(), weight)?;
        self.add_edge(to, from, weight)
    }

    /// Number of stations added so far.
    pub fn station_count(&self) -> usize {
        self.inner.stations.len()
    }

    /// Finish building.
    pub fn build(self) -> Graph {
        let mut graph = self.inner;
        graph.fingerprint = graph.compute_fingerprint();
        graph
    }
}

fn check_weight(from: &StationId, to: &StationId, weight: f64) -> Result<(), GraphError> {
    if !weight.is_finite() {
        return Err(GraphError::InvalidWeight {
            from: from.clone(),
            to: to.clone(),
            weight,
        });
    }
    if weight < 0.0 {
        return Err(GraphError::NegativeWeight {
            from: from.clone(),
            to: to.clone(),
            weight,
        });
    }
    Ok(())
}
