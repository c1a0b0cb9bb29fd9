//! Landmark distance tables for ALT search.
//!
//! For each landmark `L` we store `d(L, v)` and `d(v, L)` for every node
//! `v`. By the triangle inequality, for any node `n` and target `t`:
//!
//! - `d(n, t) >= d(L, t) - d(L, n)`
//! - `d(n, t) >= d(n, L) - d(t, L)`
//!
//! On a graph where every edge has a reverse twin of equal weight the two
//! bounds collapse to `|d(L, t) - d(L, n)|`. Keeping both directions keeps
//! the bound admissible on one-way edges too.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::StationId;
use crate::network::{Graph, NodeIndex};

use super::heuristic::Heuristic;
use super::search::{Direction, SearchError, relax};

/// Precomputed landmark distances for one graph.
///
/// Immutable once built; share it across any number of ALT searches on the
/// same graph.
#[derive(Debug, Clone)]
pub struct LandmarkTable {
    landmarks: Vec<NodeIndex>,
    /// `from_landmark[i][v]` = d(landmarks[i], v)
    from_landmark: Vec<Vec<f64>>,
    /// `to_landmark[i][v]` = d(v, landmarks[i])
    to_landmark: Vec<Vec<f64>>,
    graph_fingerprint: u64,
}

impl LandmarkTable {
    /// Run a full single-source search from (and towards) each landmark.
    ///
    /// Duplicate landmarks are only computed once. An empty landmark list
    /// gives a table whose bound is always zero.
    pub fn precompute(graph: &Graph, landmarks: &[StationId]) -> Result<Self, SearchError> {
        if graph.is_empty() {
            return Err(SearchError::EmptyGraph);
        }

        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(landmarks.len());
        for station in landmarks {
            let node = graph
                .index_of(station)
                .ok_or_else(|| SearchError::UnknownStation(station.clone()))?;
            if seen.insert(node) {
                indices.push(node);
            }
        }

        let mut from_landmark = Vec::with_capacity(indices.len());
        let mut to_landmark = Vec::with_capacity(indices.len());
        for &landmark in &indices {
            from_landmark.push(full_sweep(graph, landmark, Direction::Forward)?);
            to_landmark.push(full_sweep(graph, landmark, Direction::Reverse)?);
        }

        debug!(
            landmarks = indices.len(),
            stations = graph.node_count(),
            "Precomputed landmark distances"
        );

        Ok(Self {
            landmarks: indices,
            from_landmark,
            to_landmark,
            graph_fingerprint: graph.fingerprint(),
        })
    }

    /// Number of distinct landmarks.
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Returns true if there are no landmarks.
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Landmark nodes, in the order they were first given.
    pub fn landmarks(&self) -> &[NodeIndex] {
        &self.landmarks
    }

    /// Distance from the `i`-th landmark to `node`.
    pub fn distance_from(&self, i: usize, node: NodeIndex) -> f64 {
        self.from_landmark[i][node.0]
    }

    /// Distance from `node` to the `i`-th landmark.
    pub fn distance_to(&self, i: usize, node: NodeIndex) -> f64 {
        self.to_landmark[i][node.0]
    }

    /// Lower bound on `d(node, target)`.
    ///
    /// A term involving an infinite distance (a node on the far side of a
    /// disconnected component) contributes nothing, so the result is
    /// always finite and non-negative.
    pub fn lower_bound(&self, node: NodeIndex, target: NodeIndex) -> f64 {
        let mut best = 0.0_f64;
        for i in 0..self.landmarks.len() {
            let forward = finite_difference(
                self.distance_from(i, target),
                self.distance_from(i, node),
            );
            let backward =
                finite_difference(self.distance_to(i, node), self.distance_to(i, target));
            best = best.max(forward).max(backward);
        }
        best
    }

    /// Fail unless this table was built for `graph` (or an identical one).
    ///
    /// Stations, edges and weights all have to match: distances from a
    /// graph that merely has the same size would not be a lower bound.
    pub(crate) fn check_graph(&self, graph: &Graph) -> Result<(), SearchError> {
        if self.graph_fingerprint != graph.fingerprint() {
            return Err(SearchError::LandmarkMismatch);
        }
        Ok(())
    }
}

/// `a - b`, or zero when either side is infinite.
fn finite_difference(a: f64, b: f64) -> f64 {
    if a.is_finite() && b.is_finite() {
        a - b
    } else {
        0.0
    }
}

fn full_sweep(
    graph: &Graph,
    landmark: NodeIndex,
    direction: Direction,
) -> Result<Vec<f64>, SearchError> {
    let relaxation = relax(graph, landmark, None, &Heuristic::Zero, direction, None)?;
    Ok(relaxation.distances)
}

/// Pick `count` landmarks spread across the graph.
///
/// Greedy farthest-point selection: start from the first station, then
/// repeatedly add the station whose distance to its nearest chosen
/// landmark is largest. Stations unreachable from every chosen landmark
/// win first, so each component gets covered. Deterministic: ties go to
/// the lowest index.
pub fn select_landmarks(graph: &Graph, count: usize) -> Result<Vec<StationId>, SearchError> {
    if count == 0 || graph.is_empty() {
        return Ok(Vec::new());
    }

    let n = graph.node_count();
    let mut chosen = vec![false; n];
    let mut nearest = vec![f64::INFINITY; n];
    let mut landmarks = Vec::with_capacity(count.min(n));

    let mut next = Some(NodeIndex(0));
    while let Some(node) = next {
        chosen[node.0] = true;
        landmarks.push(graph.station(node).clone());
        if landmarks.len() >= count {
            break;
        }

        let distances = full_sweep(graph, node, Direction::Forward)?;
        for (slot, d) in nearest.iter_mut().zip(distances) {
            *slot = slot.min(d);
        }

        next = None;
        let mut best = f64::NEG_INFINITY;
        for candidate in graph.indices() {
            if chosen[candidate.0] {
                continue;
            }
            let d = nearest[candidate.0];
            if d > best {
                best = d;
                next = Some(candidate);
            }
        }
    }

    Ok(landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn ids(s: &[&str]) -> Vec<StationId> {
        s.iter().map(|x| id(x)).collect()
    }

    fn sample_graph() -> Graph {
        Graph::from_adjacency([
            ("A", vec![("B", 1.0), ("C", 4.0)]),
            ("B", vec![("A", 1.0), ("C", 2.0), ("D", 5.0)]),
            ("C", vec![("A", 4.0), ("B", 2.0), ("D", 1.0)]),
            ("D", vec![("B", 5.0), ("C", 1.0)]),
        ])
        .unwrap()
    }

    fn idx(graph: &Graph, s: &str) -> NodeIndex {
        graph.index_of(&id(s)).unwrap()
    }

    #[test]
    fn distances_from_landmark() {
        let graph = sample_graph();
        let table = LandmarkTable::precompute(&graph, &ids(&["B"])).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.distance_from(0, idx(&graph, "A")), 1.0);
        assert_eq!(table.distance_from(0, idx(&graph, "B")), 0.0);
        assert_eq!(table.distance_from(0, idx(&graph, "C")), 2.0);
        assert_eq!(table.distance_from(0, idx(&graph, "D")), 3.0);
        // Symmetric graph: both directions agree
        for v in graph.indices() {
            assert_eq!(table.distance_from(0, v), table.distance_to(0, v));
        }
    }

    #[test]
    fn symmetric_bound_is_absolute_difference() {
        let graph = sample_graph();
        let table = LandmarkTable::precompute(&graph, &ids(&["B"])).unwrap();

        // |d(B, D) - d(B, A)| = |3 - 1| = 2
        assert_eq!(table.lower_bound(idx(&graph, "A"), idx(&graph, "D")), 2.0);
        // |d(B, A) - d(B, D)| = 2
        assert_eq!(table.lower_bound(idx(&graph, "D"), idx(&graph, "A")), 2.0);
        assert_eq!(table.lower_bound(idx(&graph, "D"), idx(&graph, "D")), 0.0);
    }

    #[test]
    fn empty_landmarks_give_zero() {
        let graph = sample_graph();
        let table = LandmarkTable::precompute(&graph, &[]).unwrap();
        assert!(table.is_empty());
        for v in graph.indices() {
            assert_eq!(table.lower_bound(v, idx(&graph, "D")), 0.0);
        }
    }

    #[test]
    fn duplicate_landmarks_collapse() {
        let graph = sample_graph();
        let table = LandmarkTable::precompute(&graph, &ids(&["C", "B", "C"])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.landmarks(), &[idx(&graph, "C"), idx(&graph, "B")]);
    }

    #[test]
    fn unknown_landmark_is_error() {
        let graph = sample_graph();
        let err = LandmarkTable::precompute(&graph, &ids(&["Z"])).unwrap_err();
        assert_eq!(err, SearchError::UnknownStation(id("Z")));
    }

    #[test]
    fn empty_graph_is_error() {
        let graph = Graph::builder().build();
        assert_eq!(
            LandmarkTable::precompute(&graph, &[]).unwrap_err(),
            SearchError::EmptyGraph
        );
    }

    #[test]
    fn unreachable_terms_contribute_zero() {
        // Two components: A-B and X-Y
        let graph = Graph::from_adjacency([
            ("A", vec![("B", 3.0)]),
            ("B", vec![("A", 3.0)]),
            ("X", vec![("Y", 7.0)]),
            ("Y", vec![("X", 7.0)]),
        ])
        .unwrap();
        let table = LandmarkTable::precompute(&graph, &ids(&["A"])).unwrap();

        assert!(table.distance_from(0, idx(&graph, "X")).is_infinite());

        let h = table.lower_bound(idx(&graph, "X"), idx(&graph, "Y"));
        assert_eq!(h, 0.0);
        let h = table.lower_bound(idx(&graph, "A"), idx(&graph, "X"));
        assert_eq!(h, 0.0);
        let h = table.lower_bound(idx(&graph, "A"), idx(&graph, "B"));
        assert_eq!(h, 3.0);
    }

    #[test]
    fn one_way_edges_stay_admissible() {
        // A -> B costs 10, B -> A costs 1. Landmark at A.
        let graph = Graph::from_adjacency([("A", vec![("B", 10.0)]), ("B", vec![("A", 1.0)])])
            .unwrap();
        let table = LandmarkTable::precompute(&graph, &ids(&["A"])).unwrap();

        // True d(B, A) = 1. The naive |d(A, A) - d(A, B)| = 10 would overestimate.
        let h = table.lower_bound(idx(&graph, "B"), idx(&graph, "A"));
        assert!(h <= 1.0, "bound {h} exceeds true distance 1");
        // True d(A, B) = 10, and the forward bound is tight.
        assert_eq!(table.lower_bound(idx(&graph, "A"), idx(&graph, "B")), 10.0);
    }

    #[test]
    fn mismatch_detected() {
        let graph = sample_graph();
        let table = LandmarkTable::precompute(&graph, &ids(&["A"])).unwrap();
        let other = Graph::from_adjacency([("A", vec![("B", 1.0)])]).unwrap();
        assert_eq!(
            table.check_graph(&other).unwrap_err(),
            SearchError::LandmarkMismatch
        );
        assert!(table.check_graph(&graph).is_ok());
        assert!(table.check_graph(&sample_graph()).is_ok());
    }

    #[test]
    fn same_size_graph_with_other_weights_rejected() {
        let built_for = Graph::from_adjacency([("A", vec![("B", 100.0), ("C", 0.0)])]).unwrap();
        let searched = Graph::from_adjacency([
            ("A", vec![("B", 5.0), ("C", 1.0)]),
            ("C", vec![("B", 1.0)]),
        ])
        .unwrap();
        assert_eq!(built_for.node_count(), searched.node_count());

        let table = LandmarkTable::precompute(&built_for, &ids(&["A"])).unwrap();
        assert_eq!(
            table.check_graph(&searched).unwrap_err(),
            SearchError::LandmarkMismatch
        );
    }

    #[test]
    fn select_spreads_out() {
        // Line: A - B - C - D - E
        let mut b = Graph::builder();
        for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")] {
            b.add_bidirectional(id(from), id(to), 1.0).unwrap();
        }
        let graph = b.build();

        let picked = select_landmarks(&graph, 3).unwrap();
        assert_eq!(picked, ids(&["A", "E", "C"]));
    }

    #[test]
    fn select_covers_components() {
        let graph = Graph::from_adjacency([
            ("A", vec![("B", 1.0)]),
            ("B", vec![("A", 1.0)]),
            ("X", vec![("Y", 1.0)]),
        ])
        .unwrap();
        let picked = select_landmarks(&graph, 2).unwrap();
        assert_eq!(picked, ids(&["A", "X"]));
    }

    #[test]
    fn select_caps_at_node_count() {
        let graph = sample_graph();
        assert_eq!(select_landmarks(&graph, 10).unwrap().len(), 4);
        assert!(select_landmarks(&graph, 0).unwrap().is_empty());
    }
}
