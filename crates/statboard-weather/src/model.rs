//! Forecast domain model and the raw wire documents it is parsed from

use serde::Deserialize;

/// One forecast period, ready for presentation.
///
/// Numeric temperature and its unit are pre-joined into a single text
/// field (`"48F"`), since the dashboard renders everything as text anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastPeriod {
    /// Period name, e.g. "This Afternoon"
    pub name: String,

    /// Whether the period falls in daytime
    pub is_daytime: bool,

    /// Temperature with unit, e.g. "48F"
    pub temperature: String,

    /// Wind speed text, e.g. "12 mph" or "1 to 6 mph"
    pub wind_speed: String,

    /// Compass wind direction, e.g. "SSW"
    pub wind_direction: String,

    /// Short forecast text, e.g. "Light Rain Likely"
    pub short_forecast: String,
}

/// `/points/<lat>,<long>` response, reduced to the one field we need.
#[derive(Debug, Deserialize)]
pub(crate) struct PointDocument {
    pub properties: PointProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointProperties {
    pub forecast: String,
}

/// Gridpoint forecast response.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastDocument {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastProperties {
    pub periods: Vec<PeriodRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PeriodRecord {
    pub name: String,
    pub is_daytime: bool,
    pub temperature: i64,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,
}

impl From<PeriodRecord> for ForecastPeriod {
    fn from(record: PeriodRecord) -> Self {
        Self {
            name: record.name,
            is_daytime: record.is_daytime,
            temperature: format!("{}{}", record.temperature, record.temperature_unit),
            wind_speed: record.wind_speed,
            wind_direction: record.wind_direction,
            short_forecast: record.short_forecast,
        }
    }
}
