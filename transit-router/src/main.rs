use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_router::build::{BuildConfig, BuildError, TransitNetworkBuilder, read_json};
use transit_router::domain::{NotFoundError, StreetNodeId};
use transit_router::planner::{RouteRequest, Router, SearchConfig};
use transit_router::realtime::StaticSchedule;
use transit_router::street::{FootWeighting, InMemoryStreetNetwork, StreetNetworkData};

#[derive(Parser)]
#[command(name = "transit-router")]
#[command(about = "Multi-criteria journey planning over GTFS feeds and a street network", long_about = None)]
struct Cli {
    /// Build configuration (JSON)
    #[arg(long)]
    config: PathBuf,
    /// Search configuration (JSON), defaults if omitted
    #[arg(long)]
    search: Option<PathBuf>,
    /// Origin street node
    #[arg(long)]
    from: u32,
    /// Destination street node
    #[arg(long)]
    to: u32,
    /// Departure time, or arrival deadline with --arrive-by (RFC 3339)
    #[arg(long)]
    time: DateTime<Utc>,
    #[arg(long)]
    arrive_by: bool,
    /// Interpolate transfers even if the configuration does not ask for it
    #[arg(long)]
    interpolate: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("configuration names no street network")]
    NoStreetNetwork,

    #[error("invalid search configuration: {0}")]
    Search(#[from] transit_router::build::ConfigError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("failed to write journeys: {0}")]
    Output(#[from] serde_json::Error),
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = BuildConfig::from_file(&cli.config)?;
    let search = match &cli.search {
        Some(path) => read_json::<SearchConfig>(path)?,
        None => SearchConfig::default(),
    };

    let street_path = config
        .street_network_path
        .clone()
        .ok_or(CliError::NoStreetNetwork)?;
    let data: StreetNetworkData = read_json(&street_path)?;
    let street = Arc::new(InMemoryStreetNetwork::try_from(data)?);

    let interpolate = cli.interpolate || config.interpolate_transfers;
    let interpolation_weighting = FootWeighting::new(config.walk_speed_kmh);
    let mut builder = TransitNetworkBuilder::new(config, street)?.load_configured_feeds()?;
    if interpolate {
        let report = builder.interpolate_transfers(&interpolation_weighting)?;
        info!(inserted = report.inserted, "transfers interpolated");
    }
    let network = builder.finish();

    let (from, to) = (StreetNodeId(cli.from), StreetNodeId(cli.to));
    let request = if cli.arrive_by {
        RouteRequest::arrive_by(from, to, cli.time)
    } else {
        RouteRequest::depart_at(from, to, cli.time)
    };

    let weighting = search.foot_weighting();
    let router = Router::new(&network, &weighting, &StaticSchedule, search)?;
    let journeys = router.route(&request)?;

    println!("{}", serde_json::to_string_pretty(&journeys)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
