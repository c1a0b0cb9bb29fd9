use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_paths::batch::{random_queries, run_batch};
use transit_paths::compare::compare_strategies;
use transit_paths::domain::{DomainError, StationId};
use transit_paths::network::{Graph, LoadError, NetworkDirectory, load_network};
use transit_paths::planner::{Planner, SearchConfig, SearchError, select_landmarks};

/// Compare Dijkstra, A* and ALT shortest-path search on a transit network.
#[derive(Debug, Parser)]
#[command(name = "transit-paths", version)]
struct Cli {
    /// Network: a JSON file, or a directory of `{id}_stations.csv` /
    /// `{id}_edges.csv` pairs
    #[arg(short, long)]
    network: PathBuf,

    /// Graph id inside a CSV network directory
    #[arg(short, long)]
    graph: Option<String>,

    /// List the graphs in a CSV network directory and exit
    #[arg(long)]
    list_graphs: bool,

    /// Source station id
    #[arg(long, required_unless_present_any = ["batch", "list_graphs", "stats"])]
    from: Option<String>,

    /// Target station id
    #[arg(long, required_unless_present_any = ["batch", "list_graphs", "stats"])]
    to: Option<String>,

    /// Landmark station id for ALT (repeatable)
    #[arg(short, long = "landmark")]
    landmarks: Vec<String>,

    /// Pick this many landmarks automatically (added to --landmark)
    #[arg(long, default_value_t = 0)]
    auto_landmarks: usize,

    /// Run this many random queries instead of a single one
    #[arg(long, conflicts_with_all = ["from", "to"])]
    batch: Option<usize>,

    /// Random landmarks per batch query
    #[arg(long, default_value_t = 5)]
    batch_landmarks: usize,

    /// Seed for batch query selection
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Repetitions per algorithm for timing
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Cost units per km for the A* heuristic
    #[arg(long, default_value_t = 1.0)]
    cost_per_km: f64,

    /// Abort a search after settling this many stations
    #[arg(long)]
    max_settled: Option<usize>,

    /// Print network statistics
    #[arg(long)]
    stats: bool,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to write JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("--{0} is required")]
    MissingArgument(&'static str),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "transit-paths failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.list_graphs {
        let directory = NetworkDirectory::new(&cli.network);
        for id in directory.list_graphs()? {
            println!("{id}");
        }
        return Ok(());
    }

    let graph = open_network(cli)?;
    let stats = graph.statistics();
    info!(
        stations = stats.nodes,
        edges = stats.edges,
        average_degree = stats.average_degree,
        with_coordinates = stats.stations_with_coordinates,
        "Network loaded"
    );

    if cli.stats {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!(
                "{} stations, {} edges, average degree {:.2}, {} with coordinates",
                stats.nodes, stats.edges, stats.average_degree, stats.stations_with_coordinates
            );
        }
    }

    let config = SearchConfig::new(cli.max_settled, cli.cost_per_km);
    let planner = Planner::new(&graph, &config);

    if let Some(count) = cli.batch {
        let queries = random_queries(&graph, count, cli.batch_landmarks, cli.seed);
        let report = run_batch(&planner, &queries, cli.runs)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{report}");
        }
        return Ok(());
    }

    let (from, to) = match (&cli.from, &cli.to) {
        (Some(from), Some(to)) => (from, to),
        // --stats alone is a complete request
        (None, None) if cli.stats => return Ok(()),
        (None, _) => return Err(CliError::MissingArgument("from")),
        (_, None) => return Err(CliError::MissingArgument("to")),
    };
    let source = StationId::parse(from)?;
    let target = StationId::parse(to)?;

    let mut landmarks = cli
        .landmarks
        .iter()
        .map(|s| StationId::parse(s))
        .collect::<Result<Vec<_>, _>>()?;
    for landmark in select_landmarks(&graph, cli.auto_landmarks)? {
        if !landmarks.contains(&landmark) {
            landmarks.push(landmark);
        }
    }

    let report = compare_strategies(&planner, &source, &target, &landmarks, cli.runs)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
        if !report.costs_agree() {
            println!("Warning: algorithms disagree on cost (is --cost-per-km too large?)");
        }
    }

    Ok(())
}

fn open_network(cli: &Cli) -> Result<Graph, CliError> {
    if !cli.network.is_dir() {
        return Ok(load_network(&cli.network)?);
    }

    let directory = NetworkDirectory::new(&cli.network);
    let graph_id = cli
        .graph
        .as_deref()
        .ok_or(CliError::MissingArgument("graph"))?;
    info!(root = %directory.root().display(), graph_id, "Opening CSV network");
    Ok(directory.load(graph_id)?)
}
