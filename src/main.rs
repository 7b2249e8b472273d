//! Flarecast API Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from a TOML file (`--config`, then the platform config dir,
//! `/etc/flarecast/config.toml`, `./config.toml`), with `FLARECAST_*`
//! environment variables taking precedence. See `--generate-config` for a
//! commented starting point.

use clap::Parser;
use flarecast::analysis::AnalysisService;
use flarecast::api::{serve, AppState};
use flarecast::config::{generate_default_config, Config};
use flarecast::forecast::{
    ForecastService, ForecastSettings, GeocodingClient, LocationResolver, OpenMeteoProvider,
};
use flarecast::store::ObservationStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "flarecast", about = "Pain-environment intelligence server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a commented default config file and exit
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.generate_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config);

    tracing::info!("Starting Flarecast API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data file: {}", config.store.data_file);

    // Observation store, creating the data directory on first run
    let data_path = PathBuf::from(&config.store.data_file);
    if let Some(parent) = data_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Arc::new(ObservationStore::with_persistence(&data_path)?);
    tracing::info!(count = store.count().await, "Observation store ready");

    let analysis = Arc::new(AnalysisService::new(Arc::clone(&store)));

    let forecast = Arc::new(ForecastService::new(
        Box::new(OpenMeteoProvider::new(config.weather.forecast_url.clone())),
        ForecastSettings {
            max_days: config.weather.max_forecast_days,
            min_fetch_interval_secs: config.weather.min_fetch_interval_secs,
        },
    ));

    let resolver = Arc::new(LocationResolver::with_timeout(
        Box::new(GeocodingClient::new(config.weather.geocoding_url.clone())),
        Duration::from_secs(config.weather.location_timeout_secs),
    ));

    // Resolve the configured place name up front. A failure here is not
    // fatal: observation recording and analysis work without a location,
    // and it can be set later through the API.
    let location = match resolver.resolve(&config.weather.location).await {
        Ok(location) => {
            tracing::info!(
                name = %location.name,
                latitude = location.latitude,
                longitude = location.longitude,
                "Startup location resolved"
            );
            Some(location)
        }
        Err(e) => {
            tracing::warn!(
                query = %config.weather.location,
                error = %e,
                "Startup location lookup failed; forecasts unavailable until a location is set"
            );
            None
        }
    };

    let state = AppState::new(store, analysis, forecast, resolver, location);

    serve(state, &config.api).await?;

    tracing::info!("Flarecast stopped");
    Ok(())
}

/// Initialize tracing from the logging config
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "flarecast={},tower_http=debug",
            config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
