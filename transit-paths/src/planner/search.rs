//! Best-first shortest-path search.
//!
//! One relaxation loop serves all three strategies. The strategy only
//! decides which [`Heuristic`] orders the frontier: zero gives Dijkstra,
//! great-circle distance gives A*, and landmark bounds give ALT.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::StationId;
use crate::network::{Graph, NodeIndex};

use super::config::SearchConfig;
use super::heuristic::Heuristic;
use super::landmarks::LandmarkTable;
use super::path::reconstruct_path;

/// Error from shortest-path search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Source, target or landmark is not a node of the graph
    #[error("station {0} is not in the graph")]
    UnknownStation(StationId),

    /// Landmark precomputation on a graph with no stations
    #[error("graph has no stations")]
    EmptyGraph,

    /// Landmark table was built for a different graph
    #[error("landmark table was built for a different graph")]
    LandmarkMismatch,

    /// Search hit the configured settle limit before reaching the target.
    ///
    /// `limit` stations were settled; the frontier entry that would have
    /// been the next one is not counted.
    #[error("search budget exhausted after settling {limit} nodes")]
    BudgetExhausted { limit: usize },

    /// Invalid search configuration
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Which search strategy to run.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    /// Uninformed search.
    Dijkstra,

    /// Search guided by great-circle distance to the target.
    AStar,

    /// Search guided by precomputed landmark distances.
    Alt(&'a LandmarkTable),
}

impl Strategy<'_> {
    /// Human-readable algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Dijkstra => "Dijkstra",
            Strategy::AStar => "A* (heuristic)",
            Strategy::Alt(_) => "ALT (A* with Landmarks)",
        }
    }
}

/// Work counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Settle events (at most once per node).
    pub nodes_visited: usize,

    /// Nodes whose outgoing edges were relaxed (settled, not the target).
    pub nodes_expanded: usize,

    /// Landmarks contributing to the heuristic (ALT only).
    pub landmarks_used: usize,
}

/// Result of one shortest-path search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Name of the strategy that produced this result.
    pub algorithm: &'static str,

    /// Total path weight, or `f64::INFINITY` if the target is unreachable.
    pub cost: f64,

    /// Stations from source to target inclusive; empty if unreachable.
    pub path: Vec<StationId>,

    pub stats: SearchStats,
}

impl SearchResult {
    /// Returns true if a path was found.
    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }

    /// Work counters for this search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// Which adjacency to follow during relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Outgoing edges: distances from the source.
    Forward,
    /// Incoming edges: distances to the source.
    Reverse,
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the smallest
/// priority first, then the smallest accumulated cost, then the smallest
/// node index.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    priority: f64,
    cost: f64,
    node: NodeIndex,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// State left behind by one run of the relaxation loop.
#[derive(Debug)]
pub(crate) struct Relaxation {
    pub distances: Vec<f64>,
    pub predecessors: Vec<Option<NodeIndex>>,
    pub stats: SearchStats,
    /// Cost at which the target was settled, if it was.
    pub target_cost: Option<f64>,
}

/// Run the generalized relaxation loop from `source`.
///
/// With a `target`, stops as soon as the target is settled. Without one,
/// settles every node reachable from `source` (used for landmark
/// precomputation). Both indices must belong to `graph`.
pub(crate) fn relax(
    graph: &Graph,
    source: NodeIndex,
    target: Option<NodeIndex>,
    heuristic: &Heuristic<'_>,
    direction: Direction,
    max_settled: Option<usize>,
) -> Result<Relaxation, SearchError> {
    let n = graph.node_count();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors: Vec<Option<NodeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut stats = SearchStats::default();

    distances[source.0] = 0.0;

    let mut queue = BinaryHeap::new();
    queue.push(QueueEntry {
        priority: heuristic.estimate(source),
        cost: 0.0,
        node: source,
    });

    while let Some(QueueEntry { cost, node, .. }) = queue.pop() {
        // Stale entry: a cheaper copy of this node was settled earlier.
        if settled[node.0] {
            continue;
        }

        if let Some(limit) = max_settled {
            if stats.nodes_visited >= limit {
                return Err(SearchError::BudgetExhausted { limit });
            }
        }

        settled[node.0] = true;
        stats.nodes_visited += 1;

        trace!(
            station = %graph.station(node),
            cost,
            "Settled"
        );

        if Some(node) == target {
            return Ok(Relaxation {
                distances,
                predecessors,
                stats,
                target_cost: Some(cost),
            });
        }

        stats.nodes_expanded += 1;

        let edges = match direction {
            Direction::Forward => graph.neighbors(node),
            Direction::Reverse => graph.incoming(node),
        };

        for &(neighbor, weight) in edges {
            let candidate = cost + weight;
            if candidate < distances[neighbor.0] {
                distances[neighbor.0] = candidate;
                predecessors[neighbor.0] = Some(node);
                queue.push(QueueEntry {
                    priority: candidate + heuristic.estimate(neighbor),
                    cost: candidate,
                    node: neighbor,
                });
            }
        }
    }

    Ok(Relaxation {
        distances,
        predecessors,
        stats,
        target_cost: None,
    })
}

/// Shortest-path planner over one graph.
///
/// The planner holds only shared references; every search allocates its
/// own state and returns its own statistics, so one planner can serve any
/// number of queries, including from several threads.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    graph: &'a Graph,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a Graph, config: &'a SearchConfig) -> Self {
        Self { graph, config }
    }

    /// The graph this planner searches.
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Precompute landmark distances for ALT queries on this graph.
    pub fn precompute_landmarks(
        &self,
        landmarks: &[StationId],
    ) -> Result<LandmarkTable, SearchError> {
        LandmarkTable::precompute(self.graph, landmarks)
    }

    /// Run plain Dijkstra.
    pub fn dijkstra(
        &self,
        source: &StationId,
        target: &StationId,
    ) -> Result<SearchResult, SearchError> {
        self.compute_shortest_path(Strategy::Dijkstra, source, target)
    }

    /// Run A* with the geographic heuristic.
    pub fn astar(
        &self,
        source: &StationId,
        target: &StationId,
    ) -> Result<SearchResult, SearchError> {
        self.compute_shortest_path(Strategy::AStar, source, target)
    }

    /// Run ALT with precomputed landmarks.
    pub fn alt(
        &self,
        landmarks: &LandmarkTable,
        source: &StationId,
        target: &StationId,
    ) -> Result<SearchResult, SearchError> {
        self.compute_shortest_path(Strategy::Alt(landmarks), source, target)
    }

    /// Find the cheapest path from `source` to `target`.
    ///
    /// An unreachable target is not an error: the result has infinite
    /// cost and an empty path. Unknown stations, an invalid configuration,
    /// a landmark table from another graph, or an exhausted settle budget
    /// are errors.
    pub fn compute_shortest_path(
        &self,
        strategy: Strategy<'_>,
        source: &StationId,
        target: &StationId,
    ) -> Result<SearchResult, SearchError> {
        let graph = self.graph;

        let source_idx = graph
            .index_of(source)
            .ok_or_else(|| SearchError::UnknownStation(source.clone()))?;
        let target_idx = graph
            .index_of(target)
            .ok_or_else(|| SearchError::UnknownStation(target.clone()))?;

        self.config.validate().map_err(SearchError::InvalidConfig)?;

        let (heuristic, landmarks_used) = match strategy {
            Strategy::Dijkstra => (Heuristic::Zero, 0),
            Strategy::AStar => (
                Heuristic::geographic(graph, target_idx, self.config.cost_per_km),
                0,
            ),
            Strategy::Alt(table) => {
                table.check_graph(graph)?;
                (Heuristic::landmark(table, target_idx), table.len())
            }
        };

        let relaxation = relax(
            graph,
            source_idx,
            Some(target_idx),
            &heuristic,
            Direction::Forward,
            self.config.max_settled,
        )?;

        let mut stats = relaxation.stats;
        stats.landmarks_used = landmarks_used;

        let (cost, path) = match relaxation.target_cost {
            Some(cost) => {
                let path = reconstruct_path(&relaxation.predecessors, source_idx, target_idx)
                    .into_iter()
                    .map(|node| graph.station(node).clone())
                    .collect();
                (cost, path)
            }
            None => (f64::INFINITY, Vec::new()),
        };

        debug!(
            algorithm = strategy.name(),
            source = %source,
            target = %target,
            cost,
            hops = path.len().saturating_sub(1),
            visited = stats.nodes_visited,
            expanded = stats.nodes_expanded,
            "Search complete"
        );

        Ok(SearchResult {
            algorithm: strategy.name(),
            cost,
            path,
            stats,
        })
    }
}

/// Find the cheapest path with default configuration.
///
/// Runs ALT when `landmarks` is given (precomputing their distances first)
/// and Dijkstra otherwise. An empty landmark list behaves like Dijkstra.
///
/// # Example
///
/// ```
/// use transit_paths::domain::StationId;
/// use transit_paths::network::Graph;
/// use transit_paths::planner::compute_shortest_path;
///
/// let graph = Graph::from_adjacency([
///     ("A", vec![("B", 1.0), ("C", 4.0)]),
///     ("B", vec![("C", 2.0)]),
/// ])
/// .unwrap();
/// let a = StationId::parse("A").unwrap();
/// let c = StationId::parse("C").unwrap();
///
/// let result = compute_shortest_path(&graph, &a, &c, None).unwrap();
/// assert_eq!(result.cost, 3.0);
/// assert_eq!(result.path.len(), 3);
/// ```
pub fn compute_shortest_path(
    graph: &Graph,
    source: &StationId,
    target: &StationId,
    landmarks: Option<&[StationId]>,
) -> Result<SearchResult, SearchError> {
    let config = SearchConfig::default();
    let planner = Planner::new(graph, &config);

    match landmarks {
        Some(landmarks) => {
            if !graph.contains(source) {
                return Err(SearchError::UnknownStation(source.clone()));
            }
            let table = planner.precompute_landmarks(landmarks)?;
            planner.alt(&table, source, target)
        }
        None => planner.dijkstra(source, target),
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
