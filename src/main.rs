use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pathfinder::config::maps_api_key_from_env;
use pathfinder::models::{DistanceUnit, PathResult, TripRequest};
use pathfinder::services::fixed::FixedResolver;
use pathfinder::services::google::{GoogleMapsClient, GoogleMapsClientParams};
use pathfinder::services::refine::refine_with_measured;
use pathfinder::services::resolution::resolve_groups;
use pathfinder::utils::distance::round_for_display;
use pathfinder::{PathSearchEngine, SearchConfig};
use tracing::{info, warn};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the shortest visiting order for a trip file
    Plan {
        /// JSON trip description
        trip: PathBuf,

        /// Replace estimated leg distances with measured ones
        #[arg(long)]
        refine: bool,

        /// Report kilometres instead of miles
        #[arg(long)]
        km: bool,

        /// Disable branch-and-bound pruning
        #[arg(long)]
        no_prune: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Plan {
            trip,
            refine,
            km,
            no_prune,
        } => {
            let unit = if km {
                DistanceUnit::Kilometers
            } else {
                DistanceUnit::Miles
            };
            let config = SearchConfig::default()
                .with_unit(unit)
                .with_pruning(!no_prune);
            plan(trip, config, refine).await
        }
    }
}

async fn plan(trip_path: PathBuf, config: SearchConfig, refine: bool) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&trip_path)
        .with_context(|| format!("reading trip file {}", trip_path.display()))?;
    let trip = TripRequest::from_json(&json).context("parsing trip file")?;
    info!(
        "Loaded trip with {} destinations from {}",
        trip.destinations.len(),
        trip_path.display()
    );

    let client = maps_api_key_from_env().map(|api_key| {
        GoogleMapsClient::new(GoogleMapsClientParams {
            api_key,
            nearby_cap: config.nearby_cap,
        })
    });

    let groups = match &client {
        Some(client) => resolve_groups(client, trip.start, &trip.destinations).await?,
        None => {
            if !trip.is_offline() {
                warn!("No maps API key set, destinations without candidates cannot be resolved");
            }
            let resolver = FixedResolver::new(config.nearby_cap);
            resolve_groups(&resolver, trip.start, &trip.destinations).await?
        }
    };

    let engine = PathSearchEngine::new(config);
    let start_time = std::time::Instant::now();
    let mut result = engine.compute_optimal_path(trip.start, &groups, trip.return_to_start)?;
    let elapsed = start_time.elapsed();

    if refine {
        match &client {
            Some(client) => result = refine_with_measured(client, result).await,
            None => warn!("No maps API key set, keeping estimated distances"),
        }
    }

    print_result(&result, elapsed);
    Ok(())
}

fn print_result(result: &PathResult, elapsed: std::time::Duration) {
    let unit = result.unit.label();

    println!("Optimal Path (found in {:.2?}):", elapsed);
    println!("------------------------------------------");
    for (i, leg) in result.legs.iter().enumerate() {
        println!("{}) {}", i + 1, leg.name);
        println!(
            "   {} {} from previous, {} {} so far",
            round_for_display(leg.distance_from_previous),
            unit,
            round_for_display(leg.cumulative_distance),
            unit
        );
    }
    println!("Shortest Cumulative Distance: {} {}", result.display_total(), unit);
}
