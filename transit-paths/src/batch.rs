//! Averaged comparison over many queries.
//!
//! Queries are drawn with a seeded RNG so a batch can be repeated exactly.
//! Every query goes through [`compare_strategies`], so each one gets its own
//! landmark table and the same cost agreement check.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::compare::{compare_strategies, speedup};
use crate::domain::StationId;
use crate::network::{Graph, NodeIndex};
use crate::planner::{Planner, SearchError};

/// One source/target pair and the landmarks to use for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub source: StationId,
    pub target: StationId,
    pub landmarks: Vec<StationId>,
}

/// Draw `count` queries from `graph`.
///
/// Each query samples `landmarks_per_query + 2` distinct stations: the
/// first is the source, the second the target, the rest are landmarks.
/// On small graphs the landmark count shrinks to fit. A graph with fewer
/// than two stations yields no queries.
pub fn random_queries(
    graph: &Graph,
    count: usize,
    landmarks_per_query: usize,
    seed: u64,
) -> Vec<Query> {
    let n = graph.node_count();
    if n < 2 {
        return Vec::new();
    }
    let landmarks = landmarks_per_query.min(n - 2);
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let picked: Vec<&StationId> = rand::seq::index::sample(&mut rng, n, landmarks + 2)
                .into_iter()
                .map(|i| graph.station(NodeIndex(i)))
                .collect();
            Query {
                source: picked[0].clone(),
                target: picked[1].clone(),
                landmarks: picked[2..].iter().map(|s| (*s).clone()).collect(),
            }
        })
        .collect()
}

/// Per-strategy averages over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub algorithm: &'static str,
    pub mean_ms: f64,
    pub mean_visited: f64,
    pub mean_expanded: f64,

    /// Dijkstra's mean time divided by this strategy's.
    pub speedup: f64,
}

/// Outcome of [`run_batch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub queries: usize,

    /// Queries whose target could not be reached.
    pub unreachable: usize,

    /// Queries where the strategies returned different costs.
    pub disagreements: usize,

    /// Mean landmark precomputation time per query, in milliseconds.
    pub mean_precompute_ms: f64,

    pub rows: Vec<BatchRow>,
}

impl BatchReport {
    /// The row with the lowest mean time (first wins ties).
    pub fn fastest(&self) -> Option<&BatchRow> {
        self.rows
            .iter()
            .reduce(|best, row| if row.mean_ms < best.mean_ms { row } else { best })
    }

    /// The row with the fewest nodes visited on average (first wins ties).
    pub fn least_visited(&self) -> Option<&BatchRow> {
        self.rows.iter().reduce(|best, row| {
            if row.mean_visited < best.mean_visited {
                row
            } else {
                best
            }
        })
    }
}

#[derive(Default)]
struct Totals {
    algorithm: &'static str,
    ms: f64,
    visited: usize,
    expanded: usize,
}

/// Compare every strategy on each query and average the results.
///
/// Unreachable queries are counted and still contribute their work
/// counters, since proving unreachability is real work.
pub fn run_batch(
    planner: &Planner<'_>,
    queries: &[Query],
    runs: usize,
) -> Result<BatchReport, SearchError> {
    let mut totals: Vec<Totals> = Vec::new();
    let mut precompute_ms = 0.0;
    let mut unreachable = 0;
    let mut disagreements = 0;

    for (i, query) in queries.iter().enumerate() {
        let report = compare_strategies(
            planner,
            &query.source,
            &query.target,
            &query.landmarks,
            runs,
        )?;

        precompute_ms += report.precompute_ms;
        if !report.costs_agree() {
            disagreements += 1;
        }
        if report.rows.first().is_some_and(|row| !row.cost.is_finite()) {
            unreachable += 1;
        }

        if totals.is_empty() {
            totals = report
                .rows
                .iter()
                .map(|row| Totals {
                    algorithm: row.algorithm,
                    ..Totals::default()
                })
                .collect();
        }
        for (total, row) in totals.iter_mut().zip(&report.rows) {
            total.ms += row.timing.mean_ms;
            total.visited += row.stats.nodes_visited;
            total.expanded += row.stats.nodes_expanded;
        }

        debug!(
            query = i,
            source = %query.source,
            target = %query.target,
            "Batch query done"
        );
    }

    let count = queries.len().max(1) as f64;
    let baseline_ms = totals.first().map_or(0.0, |t| t.ms / count);
    let rows = totals
        .into_iter()
        .map(|t| {
            let mean_ms = t.ms / count;
            BatchRow {
                algorithm: t.algorithm,
                mean_ms,
                mean_visited: t.visited as f64 / count,
                mean_expanded: t.expanded as f64 / count,
                speedup: speedup(baseline_ms, mean_ms),
            }
        })
        .collect();

    info!(
        queries = queries.len(),
        unreachable, disagreements, "Batch complete"
    );

    Ok(BatchReport {
        queries: queries.len(),
        unreachable,
        disagreements,
        mean_precompute_ms: precompute_ms / count,
        rows,
    })
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Batch: {} queries ({} unreachable, {} disagreeing), precompute {:.4} ms/query",
            self.queries, self.unreachable, self.disagreements, self.mean_precompute_ms,
        )?;
        writeln!(
            f,
            "{:<26} {:>14} {:>12} {:>13} {:>8}",
            "Algorithm", "Avg time (ms)", "Avg visited", "Avg expanded", "Speedup"
        )?;
        writeln!(f, "{}", "-".repeat(77))?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<26} {:>14.4} {:>12.1} {:>13.1} {:>7.2}x",
                row.algorithm, row.mean_ms, row.mean_visited, row.mean_expanded, row.speedup,
            )?;
        }
        if let Some(row) = self.fastest() {
            writeln!(f, "Fastest: {} ({:.4} ms)", row.algorithm, row.mean_ms)?;
        }
        if let Some(row) = self.least_visited() {
            writeln!(
                f,
                "Fewest visited: {} ({:.1} nodes)",
                row.algorithm, row.mean_visited
            )?;
        }
        Ok(())
    }
}
