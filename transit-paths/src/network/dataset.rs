//! CSV network directories.
//!
//! A directory holds any number of graphs, each as a pair of files:
//!
//! - `{graph_id}_stations.csv` with columns `station_id,graph_id,name,lat,lon`
//! - `{graph_id}_edges.csv` with columns
//!   `from_station,to_station,travel_time_min,bidirectional`
//!
//! `graph_id` and `name` are informational. `bidirectional` is `1` for a
//! two-way edge; a missing column or empty cell also means two-way, and
//! any other value means one-way.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::StationId;

use super::graph::Graph;
use super::loader::{EdgeRecord, LoadError, NetworkFile, StationRecord};

const STATIONS_SUFFIX: &str = "_stations.csv";
const EDGES_SUFFIX: &str = "_edges.csv";

/// A row of a stations file.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvStation {
    pub station_id: StationId,

    #[serde(default)]
    pub graph_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    pub lat: f64,
    pub lon: f64,
}

/// A row of an edges file.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvEdge {
    pub from_station: StationId,
    pub to_station: StationId,
    pub travel_time_min: f64,

    #[serde(default)]
    pub bidirectional: Option<u8>,
}

impl From<CsvStation> for StationRecord {
    fn from(row: CsvStation) -> Self {
        StationRecord {
            id: row.station_id,
            name: row.name,
            lat: Some(row.lat),
            lon: Some(row.lon),
        }
    }
}

impl From<CsvEdge> for EdgeRecord {
    fn from(row: CsvEdge) -> Self {
        EdgeRecord {
            from: row.from_station,
            to: row.to_station,
            weight: row.travel_time_min,
            bidirectional: row.bidirectional.is_none_or(|b| b == 1),
        }
    }
}

fn read_rows<T, R>(reader: R) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize()
        .map(|row| row.map_err(LoadError::from))
        .collect()
}

/// Parse a stations CSV and an edges CSV into a network document.
pub fn read_csv_network<S: Read, E: Read>(
    stations: S,
    edges: E,
) -> Result<NetworkFile, LoadError> {
    let stations: Vec<CsvStation> = read_rows(stations)?;
    let edges: Vec<CsvEdge> = read_rows(edges)?;

    Ok(NetworkFile {
        stations: stations.into_iter().map(StationRecord::from).collect(),
        edges: edges.into_iter().map(EdgeRecord::from).collect(),
    })
}

/// A directory of CSV networks.
#[derive(Debug, Clone)]
pub struct NetworkDirectory {
    root: PathBuf,
}

impl NetworkDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids of every graph with a stations file, sorted.
    ///
    /// A directory that does not exist holds no graphs.
    pub fn list_graphs(&self) -> Result<Vec<String>, LoadError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = BTreeSet::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            if let Some(id) = name.to_str().and_then(|n| n.strip_suffix(STATIONS_SUFFIX)) {
                if !id.is_empty() {
                    ids.insert(id.to_string());
                }
            }
        }
        Ok(ids.into_iter().collect())
    }

    /// Load the graph stored as `{graph_id}_stations.csv` and
    /// `{graph_id}_edges.csv`.
    pub fn load(&self, graph_id: &str) -> Result<Graph, LoadError> {
        let stations_path = self.root.join(format!("{graph_id}{STATIONS_SUFFIX}"));
        let edges_path = self.root.join(format!("{graph_id}{EDGES_SUFFIX}"));
        if !stations_path.is_file() || !edges_path.is_file() {
            return Err(LoadError::MissingGraph(graph_id.to_string()));
        }

        let stations = BufReader::new(File::open(&stations_path)?);
        let edges = BufReader::new(File::open(&edges_path)?);
        let graph = read_csv_network(stations, edges)?.into_graph()?;

        debug!(
            graph_id,
            root = %self.root.display(),
            stations = graph.node_count(),
            edges = graph.edge_count(),
            "Loaded CSV network"
        );

        Ok(graph)
    }
}
