//! Side-by-side comparison of the search strategies.
//!
//! Runs Dijkstra, A* and ALT on the same query, times each, and checks
//! that they agree on the optimal cost. Landmark precomputation is timed
//! separately since its cost is paid once per session, not per query.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::StationId;
use crate::planner::{Planner, SearchError, SearchResult, SearchStats, Strategy};

/// Relative tolerance when comparing costs across strategies.
const COST_TOLERANCE: f64 = 1e-9;

/// Wall-clock timings over repeated runs, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timing {
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Timing {
    fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self {
                mean_ms: 0.0,
                min_ms: 0.0,
                max_ms: 0.0,
            };
        }
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        Self {
            mean_ms: ms.iter().sum::<f64>() / ms.len() as f64,
            min_ms: ms.iter().copied().fold(f64::INFINITY, f64::min),
            max_ms: ms.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// One strategy's outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub algorithm: &'static str,
    pub cost: f64,
    pub path: Vec<StationId>,
    pub stats: SearchStats,
    pub timing: Timing,
}

impl ComparisonRow {
    fn new(result: SearchResult, timing: Timing) -> Self {
        Self {
            algorithm: result.algorithm,
            cost: result.cost,
            path: result.path,
            stats: result.stats,
            timing,
        }
    }
}

/// Outcome of [`compare_strategies`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub source: StationId,
    pub target: StationId,
    pub landmarks: Vec<StationId>,
    pub runs: usize,

    /// Time spent precomputing landmark distances, in milliseconds.
    pub precompute_ms: f64,

    pub rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Returns true if every strategy reached the same optimal cost.
    ///
    /// Finite costs are compared with a small relative tolerance, since
    /// equally short paths may sum their weights in a different order.
    pub fn costs_agree(&self) -> bool {
        let Some(first) = self.rows.first() else {
            return true;
        };
        self.rows.iter().all(|row| costs_equal(row.cost, first.cost))
    }

    /// The reachable row that settled the fewest nodes (first wins ties).
    pub fn least_visited(&self) -> Option<&ComparisonRow> {
        self.reachable_rows().reduce(|best, row| {
            if row.stats.nodes_visited < best.stats.nodes_visited {
                row
            } else {
                best
            }
        })
    }

    /// The reachable row with the lowest mean time (first wins ties).
    pub fn fastest(&self) -> Option<&ComparisonRow> {
        self.reachable_rows().reduce(|best, row| {
            if row.timing.mean_ms < best.timing.mean_ms {
                row
            } else {
                best
            }
        })
    }

    /// Mean time of the first row (Dijkstra) divided by `row`'s.
    pub fn speedup(&self, row: &ComparisonRow) -> f64 {
        match self.rows.first() {
            Some(baseline) => speedup(baseline.timing.mean_ms, row.timing.mean_ms),
            None => 0.0,
        }
    }

    fn reachable_rows(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| row.cost.is_finite())
    }
}

/// `baseline_ms / ms`, infinite when only `ms` is zero and 1 when both are.
pub(crate) fn speedup(baseline_ms: f64, ms: f64) -> f64 {
    if baseline_ms <= 0.0 && ms <= 0.0 {
        1.0
    } else if ms <= 0.0 {
        f64::INFINITY
    } else {
        baseline_ms / ms
    }
}

fn costs_equal(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= COST_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Run every strategy on one query.
///
/// Each strategy is run `runs` times (at least once); the last result is
/// reported together with timings over all runs.
pub fn compare_strategies(
    planner: &Planner<'_>,
    source: &StationId,
    target: &StationId,
    landmarks: &[StationId],
    runs: usize,
) -> Result<ComparisonReport, SearchError> {
    let runs = runs.max(1);

    // Fail on a bad source before paying for landmark precomputation.
    if !planner.graph().contains(source) {
        return Err(SearchError::UnknownStation(source.clone()));
    }

    let started = Instant::now();
    let table = planner.precompute_landmarks(landmarks)?;
    let precompute_ms = started.elapsed().as_secs_f64() * 1000.0;

    let mut rows = Vec::with_capacity(3);
    for strategy in [Strategy::Dijkstra, Strategy::AStar, Strategy::Alt(&table)] {
        let mut samples = Vec::with_capacity(runs);
        let mut last = None;
        for _ in 0..runs {
            let started = Instant::now();
            let result = planner.compute_shortest_path(strategy, source, target)?;
            samples.push(started.elapsed());
            last = Some(result);
        }
        if let Some(result) = last {
            let timing = Timing::from_samples(&samples);
            debug!(
                algorithm = result.algorithm,
                mean_ms = timing.mean_ms,
                visited = result.stats.nodes_visited,
                "Strategy timed"
            );
            rows.push(ComparisonRow::new(result, timing));
        }
    }

    let report = ComparisonReport {
        source: source.clone(),
        target: target.clone(),
        landmarks: landmarks.to_vec(),
        runs,
        precompute_ms,
        rows,
    };

    if !report.costs_agree() {
        let costs: Vec<String> = report
            .rows
            .iter()
            .map(|r| format!("{}={}", r.algorithm, r.cost))
            .collect();
        warn!(
            source = %source,
            target = %target,
            costs = %costs.join(", "),
            "Strategies disagree on optimal cost; check heuristic scale"
        );
    }

    Ok(report)
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} -> {} ({} run{}, {} landmark{}, precompute {:.4} ms)",
            self.source,
            self.target,
            self.runs,
            if self.runs == 1 { "" } else { "s" },
            self.landmarks.len(),
            if self.landmarks.len() == 1 { "" } else { "s" },
            self.precompute_ms,
        )?;
        writeln!(
            f,
            "{:<26} {:>12} {:>6} {:>14} {:>8} {:>9} {:>8}",
            "Algorithm", "Cost", "Stops", "Mean (ms)", "Visited", "Expanded", "Speedup"
        )?;
        writeln!(f, "{}", "-".repeat(89))?;
        for row in &self.rows {
            let cost = if row.cost.is_finite() {
                format!("{:.2}", row.cost)
            } else {
                "no path".to_string()
            };
            writeln!(
                f,
                "{:<26} {:>12} {:>6} {:>14.4} {:>8} {:>9} {:>7.2}x",
                row.algorithm,
                cost,
                row.path.len(),
                row.timing.mean_ms,
                row.stats.nodes_visited,
                row.stats.nodes_expanded,
                self.speedup(row),
            )?;
        }
        if let Some(row) = self.fastest() {
            writeln!(f, "Fastest: {} ({:.4} ms)", row.algorithm, row.timing.mean_ms)?;
        }
        if let Some(row) = self.least_visited() {
            writeln!(
                f,
                "Fewest visited: {} ({} nodes)",
                row.algorithm, row.stats.nodes_visited
            )?;
        }
        if let Some(path) = self.rows.first().map(|r| &r.path) {
            if !path.is_empty() {
                let names: Vec<&str> = path.iter().map(|s| s.as_str()).collect();
                writeln!(f, "Path: {}", names.join(" -> "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Graph;
    use crate::planner::SearchConfig;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
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

    fn row(algorithm: &'static str, cost: f64, visited: usize) -> ComparisonRow {
        timed_row(algorithm, cost, visited, 0.0)
    }

    fn timed_row(algorithm: &'static str, cost: f64, visited: usize, ms: f64) -> ComparisonRow {
        ComparisonRow {
            algorithm,
            cost,
            path: Vec::new(),
            stats: SearchStats {
                nodes_visited: visited,
                ..SearchStats::default()
            },
            timing: Timing {
                mean_ms: ms,
                min_ms: ms,
                max_ms: ms,
            },
        }
    }

    fn report(rows: Vec<ComparisonRow>) -> ComparisonReport {
        ComparisonReport {
            source: id("A"),
            target: id("B"),
            landmarks: Vec::new(),
            runs: 1,
            precompute_ms: 0.0,
            rows,
        }
    }

    #[test]
    fn compares_all_three() {
        let graph = sample_graph();
        let config = SearchConfig::default();
        let planner = Planner::new(&graph, &config);

        let report =
            compare_strategies(&planner, &id("A"), &id("D"), &[id("B"), id("C")], 3).unwrap();

        let names: Vec<&str> = report.rows.iter().map(|r| r.algorithm).collect();
        assert_eq!(names, vec!["Dijkstra", "A* (heuristic)", "ALT (A* with Landmarks)"]);
        assert!(report.costs_agree());
        assert_eq!(report.runs, 3);
        for row in &report.rows {
            assert_eq!(row.cost, 4.0);
            assert!(row.timing.min_ms <= row.timing.mean_ms);
            assert!(row.timing.mean_ms <= row.timing.max_ms);
        }
        assert_eq!(report.rows[2].stats.landmarks_used, 2);
    }

    #[test]
    fn zero_runs_means_one() {
        let graph = sample_graph();
        let config = SearchConfig::default();
        let planner = Planner::new(&graph, &config);

        let report = compare_strategies(&planner, &id("A"), &id("B"), &[], 0).unwrap();
        assert_eq!(report.runs, 1);
        assert_eq!(report.rows.len(), 3);
    }

    #[test]
    fn unknown_source_is_error() {
        let graph = sample_graph();
        let config = SearchConfig::default();
        let planner = Planner::new(&graph, &config);

        let err = compare_strategies(&planner, &id("X"), &id("A"), &[id("Y")], 1).unwrap_err();
        assert_eq!(err, SearchError::UnknownStation(id("X")));
    }

    #[test]
    fn agreement_tolerates_rounding() {
        assert!(report(vec![row("a", 1.0, 1), row("b", 1.0 + 1e-12, 1)]).costs_agree());
        assert!(!report(vec![row("a", 1.0, 1), row("b", 1.1, 1)]).costs_agree());
        assert!(report(vec![row("a", f64::INFINITY, 1), row("b", f64::INFINITY, 1)]).costs_agree());
        assert!(!report(vec![row("a", 2.0, 1), row("b", f64::INFINITY, 1)]).costs_agree());
        assert!(report(vec![]).costs_agree());
    }

    #[test]
    fn least_visited_prefers_first_on_tie() {
        let r = report(vec![row("a", 1.0, 4), row("b", 1.0, 2), row("c", 1.0, 2)]);
        assert_eq!(r.least_visited().map(|r| r.algorithm), Some("b"));
        assert!(report(vec![]).least_visited().is_none());
    }

    #[test]
    fn unreachable_rows_never_win() {
        let r = report(vec![
            timed_row("a", 3.0, 5, 2.0),
            timed_row("b", f64::INFINITY, 1, 0.5),
            timed_row("c", 3.0, 4, 1.0),
        ]);
        assert_eq!(r.fastest().map(|r| r.algorithm), Some("c"));
        assert_eq!(r.least_visited().map(|r| r.algorithm), Some("c"));
    }

    #[test]
    fn speedup_is_relative_to_first_row() {
        let r = report(vec![
            timed_row("a", 1.0, 1, 4.0),
            timed_row("b", 1.0, 1, 2.0),
            timed_row("c", 1.0, 1, 0.0),
        ]);
        assert_eq!(r.speedup(&r.rows[0]), 1.0);
        assert_eq!(r.speedup(&r.rows[1]), 2.0);
        assert!(r.speedup(&r.rows[2]).is_infinite());
        assert_eq!(speedup(0.0, 0.0), 1.0);
    }

    #[test]
    fn display_lists_rows_and_path() {
        let graph = sample_graph();
        let config = SearchConfig::default();
        let planner = Planner::new(&graph, &config);
        let report = compare_strategies(&planner, &id("A"), &id("D"), &[id("B")], 1).unwrap();

        let text = report.to_string();
        assert!(text.starts_with("A -> D (1 run, 1 landmark"));
        assert!(text.contains("Dijkstra"));
        assert!(text.contains("ALT (A* with Landmarks)"));
        assert!(text.contains("4.00"));
        assert!(text.contains("Path: A -> B -> C -> D"));
        assert!(text.contains("Speedup"));
        assert!(text.contains("Fastest: "));
        assert!(text.contains("Fewest visited: "));
    }

    #[test]
    fn london_termini_network() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/london_termini.json");
        let graph = crate::network::load_network(path).unwrap();
        let config = SearchConfig::default();
        let planner = Planner::new(&graph, &config);
        let landmarks = crate::planner::select_landmarks(&graph, 3).unwrap();

        let report = compare_strategies(&planner, &id("PAD"), &id("LBG"), &landmarks, 2).unwrap();

        assert!(report.costs_agree());
        let expected: Vec<StationId> = ["PAD", "EUS", "KGX", "MOG", "CST", "LBG"]
            .iter()
            .map(|s| id(s))
            .collect();
        for row in &report.rows {
            assert_eq!(row.cost, 50.0, "{}", row.algorithm);
            assert_eq!(row.path, expected, "{}", row.algorithm);
        }
        let dijkstra = &report.rows[0].stats;
        assert!(report.rows[1].stats.nodes_visited <= dijkstra.nodes_visited);
        assert!(report.rows[2].stats.nodes_visited <= dijkstra.nodes_visited);
    }

    #[test]
    fn display_marks_unreachable() {
        let mut builder = Graph::builder();
        builder.add_station(id("A"));
        builder.add_station(id("B"));
        let graph = builder.build();
        let config = SearchConfig::default();
        let planner = Planner::new(&graph, &config);
        let report = compare_strategies(&planner, &id("A"), &id("B"), &[], 1).unwrap();

        assert!(report.costs_agree());
        let text = report.to_string();
        assert!(text.contains("no path"));
        assert!(!text.contains("Path:"));
        assert!(!text.contains("Fastest:"));
    }
}
