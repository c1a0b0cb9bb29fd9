//! Lower-bound estimates of the remaining cost to the target.
//!
//! Every variant is admissible: it never exceeds the true shortest distance
//! from a node to the target. Missing information (no coordinates, no
//! landmarks, unreachable landmark distances) always degrades towards zero,
//! never towards a larger or undefined value.

use crate::domain::Coordinate;
use crate::network::{Graph, NodeIndex};

use super::landmarks::LandmarkTable;

/// Heuristic used to order the search frontier.
#[derive(Debug, Clone, Copy)]
pub enum Heuristic<'a> {
    /// Always zero: plain Dijkstra.
    Zero,

    /// Great-circle distance to the target, scaled into cost units.
    Geographic {
        graph: &'a Graph,
        target: Option<Coordinate>,
        cost_per_km: f64,
    },

    /// Triangle-inequality bound from precomputed landmark distances.
    Landmark {
        table: &'a LandmarkTable,
        target: NodeIndex,
    },
}

impl<'a> Heuristic<'a> {
    /// Geographic heuristic towards `target`.
    pub fn geographic(graph: &'a Graph, target: NodeIndex, cost_per_km: f64) -> Self {
        Heuristic::Geographic {
            graph,
            target: graph.coordinate(target),
            cost_per_km,
        }
    }

    /// Landmark heuristic towards `target`.
    pub fn landmark(table: &'a LandmarkTable, target: NodeIndex) -> Self {
        Heuristic::Landmark { table, target }
    }

    /// Estimated remaining cost from `node` to the target.
    ///
    /// Always finite and non-negative.
    pub fn estimate(&self, node: NodeIndex) -> f64 {
        match *self {
            Heuristic::Zero => 0.0,
            Heuristic::Geographic {
                graph,
                target,
                cost_per_km,
            } => match (graph.coordinate(node), target) {
                (Some(from), Some(to)) => from.haversine_km(&to) * cost_per_km,
                _ => 0.0,
            },
            Heuristic::Landmark { table, target } => table.lower_bound(node, target),
        }
    }
}
