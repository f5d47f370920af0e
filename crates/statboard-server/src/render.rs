//! Encoding of a snapshot into the dashboard wire format
//!
//! Kept free of HTTP concerns so the exact bytes can be tested directly.

use chrono::{DateTime, Local};
use statboard_core::{ProtocolError, TabularWriter};

use crate::state::Snapshot;

/// Encode the full `/data` payload: an `UpdateTime` dataset with one row,
/// then a `WeatherForecast` dataset with one row per period.
///
/// Encodes into a fresh buffer and only hands it out when the whole
/// session succeeded, so a failed session never leaks partial output.
pub fn render_data(
    snapshot: &Snapshot,
    now: DateTime<Local>,
    refresh_secs: u64,
) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    let mut writer = TabularWriter::new(&mut buf);

    writer.begin_dataset("UpdateTime");
    writer.write_columns(&["lastUpdated", "currentTime", "secondsToNextUpdate"]);
    writer
        .open_row()
        .write_text(&snapshot.updated_at.to_rfc2822())
        .write_text(&now.to_rfc2822())
        .write_int(i64::try_from(refresh_secs).unwrap_or(i64::MAX))
        .close();

    writer.begin_dataset("WeatherForecast");
    writer.write_columns(&[
        "Name",
        "IsDayTime",
        "Temperature",
        "WindSpeed",
        "WindDirection",
        "ShortForecast",
    ]);
    for period in &snapshot.periods {
        writer
            .open_row()
            .write_text(&period.name)
            .write_bool(period.is_daytime)
            .write_text(&period.temperature)
            .write_text(&period.wind_speed)
            .write_text(&period.wind_direction)
            .write_text(&period.short_forecast)
            .close();
    }
    writer.finish();

    if let Some(err) = writer.err() {
        return Err(err.clone());
    }
    drop(writer);
    Ok(buf)
}
