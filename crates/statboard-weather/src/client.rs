//! HTTP client for the weather API

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{ForecastDocument, ForecastPeriod, PointDocument};

/// Identifies this service to api.weather.gov, which rejects anonymous
/// clients.
const USER_AGENT: &str = "Statboard/0.1 (https://github.com/statboard-dev/statboard)";

/// Client for the api.weather.gov forecast endpoints.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
}

impl WeatherClient {
    /// Build a client with the service's User-Agent applied to every
    /// request.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    /// Resolve a latitude/longitude pair to its gridpoint forecast URL.
    ///
    /// The resolution is stable for a location, so callers should do this
    /// once at startup and keep the URL.
    pub async fn forecast_url(&self, latitude: &str, longitude: &str) -> Result<String> {
        let url = format!("https://api.weather.gov/points/{latitude},{longitude}");
        let doc: PointDocument = self.get_json(&url).await?;
        Ok(doc.properties.forecast)
    }

    /// Fetch the current forecast periods, in the order the API returns
    /// them.
    pub async fn forecast(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>> {
        let doc: ForecastDocument = self.get_json(forecast_url).await?;
        periods_from(doc)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "requesting weather data");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

fn periods_from(doc: ForecastDocument) -> Result<Vec<ForecastPeriod>> {
    let periods: Vec<ForecastPeriod> = doc
        .properties
        .periods
        .into_iter()
        .map(ForecastPeriod::from)
        .collect();
    if periods.is_empty() {
        return Err(Error::NoPeriods);
    }
    Ok(periods)
}
