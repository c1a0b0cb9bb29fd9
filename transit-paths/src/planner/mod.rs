//! Shortest-path planner.
//!
//! This module implements the search engine that answers: "what is the
//! cheapest way from this station to that one?"
//!
//! A single best-first relaxation loop runs in three configurations:
//! Dijkstra (no heuristic), A* (great-circle heuristic) and ALT (landmark
//! triangle-inequality heuristic). All three return the same optimal cost;
//! the heuristic only changes how much of the graph is explored.

mod config;
mod heuristic;
mod landmarks;
mod path;
mod search;

pub use config::SearchConfig;
pub use heuristic::Heuristic;
pub use landmarks::{LandmarkTable, select_landmarks};
pub use path::reconstruct_path;
pub use search::{
    Planner, SearchError, SearchResult, SearchStats, Strategy, compute_shortest_path,
};
