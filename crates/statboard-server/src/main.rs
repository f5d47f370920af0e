//! Statboard server
//!
//! Small HTTP service feeding an e-ink dashboard: it keeps the latest
//! forecast cached in memory, refreshes it in the background, and serves
//! it on demand in the tabular wire format from `statboard-core`.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use clap::Parser;
use statboard_weather::WeatherClient;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;
mod render;
mod state;
mod updater;

use state::AppState;

/// Statboard - dashboard status feed
#[derive(Parser)]
#[command(name = "statboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Latitude for weather data
    #[arg(long)]
    latitude: String,

    /// Longitude for weather data
    #[arg(long)]
    longitude: String,

    /// Port to serve on (listens on localhost)
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Seconds between forecast refreshes
    #[arg(long, default_value_t = 3600)]
    refresh_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.refresh_secs == 0 {
        anyhow::bail!("--refresh-secs must be at least 1");
    }

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = WeatherClient::new().context("could not build the weather client")?;
    let forecast_url = client
        .forecast_url(&cli.latitude, &cli.longitude)
        .await
        .context("could not resolve the forecast url")?;
    info!(%forecast_url, "resolved forecast endpoint");

    let state = AppState::new(cli.refresh_secs);

    // One synchronous fetch before serving, so /data has something to say
    // from the first request on.
    updater::refresh(&state, &client, &forecast_url).await;
    tokio::spawn(updater::run(
        state.clone(),
        client,
        forecast_url,
        Duration::from_secs(cli.refresh_secs),
    ));

    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/data", get(handlers::data))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server exited")?;

    Ok(())
}
