//! Background forecast refresh

use std::time::Duration;

use chrono::Local;
use statboard_weather::WeatherClient;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::state::{AppState, Snapshot};

/// Fetch the forecast once and swap it into the shared state.
///
/// A failed fetch is logged and the previous snapshot is kept, so the
/// dashboard keeps showing the last good data (with its honest
/// `lastUpdated` timestamp) through transient API trouble.
pub async fn refresh(state: &AppState, client: &WeatherClient, forecast_url: &str) {
    info!("performing data update");
    match client.forecast(forecast_url).await {
        Ok(periods) => {
            let snapshot = Snapshot {
                updated_at: Local::now(),
                periods,
            };
            *state.latest.write().await = Some(snapshot);
        }
        Err(err) => warn!(%err, "error getting the forecast"),
    }
}

/// Refresh on a fixed cadence, forever.
pub async fn run(
    state: AppState,
    client: WeatherClient,
    forecast_url: String,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; startup already fetched once.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        refresh(&state, &client, &forecast_url).await;
    }
}
