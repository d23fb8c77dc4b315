//! Plan a walking route and list points of interest along its corridor.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sidetrip_cli::config::Config;
use sidetrip_cli::markers::{run_marker_task, ConsoleRenderer};
use sidetrip_engine::RoutePlanner;
use sidetrip_maps::MapsClient;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Starting point (free-text address or place name)
    #[arg(long)]
    from: String,

    /// Destination
    #[arg(long)]
    to: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sidetrip_engine=debug".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    if config.maps_api_key.is_empty() {
        eprintln!("SIDETRIP_MAPS_KEY is not set; provider requests will likely be denied");
    }

    let maps = Arc::new(MapsClient::new(
        config.maps_base_url.clone(),
        config.maps_api_key.clone(),
    ));
    let planner = Arc::new(RoutePlanner::new(
        Arc::clone(&maps),
        maps,
        config.discovery(),
    ));

    let events = planner.subscribe();
    let marker_task = tokio::spawn(async move {
        let mut renderer = ConsoleRenderer::default();
        run_marker_task(events, &mut renderer).await;
    });

    match planner.plan(&args.from, &args.to).await {
        Ok(summary) => {
            println!(
                "Route: {:.1} km, {} search anchors",
                summary.route_distance_m / 1000.0,
                summary.anchor_count
            );
            println!("Points of interest ({}):", summary.results.len());
            for poi in &summary.results {
                match poi.rating {
                    Some(rating) => println!(
                        "  {} - {} [{} ({})]",
                        poi.name,
                        poi.vicinity,
                        rating,
                        poi.rating_count.unwrap_or(0)
                    ),
                    None => println!("  {} - {}", poi.name, poi.vicinity),
                }
            }
        }
        Err(e) => eprintln!("{e}"),
    }

    // Dropping the planner closes the event stream and lets the marker
    // task drain out.
    drop(planner);
    marker_task.await?;

    Ok(())
}
