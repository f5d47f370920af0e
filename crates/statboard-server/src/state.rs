//! Shared state between the updater and the request handlers

use std::sync::Arc;

use chrono::{DateTime, Local};
use statboard_weather::ForecastPeriod;
use tokio::sync::RwLock;

/// The most recent successful forecast fetch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// When the fetch completed
    pub updated_at: DateTime<Local>,

    /// Forecast periods, in API order
    pub periods: Vec<ForecastPeriod>,
}

/// Handle to the service's shared state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Latest snapshot; `None` until the first successful fetch
    pub latest: Arc<RwLock<Option<Snapshot>>>,

    /// Configured refresh cadence, advertised to the dashboard so it
    /// knows when to poll again
    pub refresh_secs: u64,
}

impl AppState {
    /// Create empty state with the given refresh cadence.
    pub fn new(refresh_secs: u64) -> Self {
        Self {
            latest: Arc::new(RwLock::new(None)),
            refresh_secs,
        }
    }
}
