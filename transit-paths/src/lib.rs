//! Shortest paths over transit networks.
//!
//! Compares three single-source, single-target strategies that share one
//! relaxation loop: Dijkstra, A* with a great-circle heuristic, and ALT
//! (A*, Landmarks, Triangle inequality).

pub mod batch;
pub mod compare;
pub mod domain;
pub mod network;
pub mod planner;
