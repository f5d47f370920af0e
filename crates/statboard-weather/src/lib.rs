//! Statboard Weather Client
//!
//! Fetches forecast data from api.weather.gov. The service organizes the
//! world into grid points: a latitude/longitude pair is first resolved
//! through `/points/<lat>,<long>` to a gridpoint forecast URL, and that URL
//! is then polled for forecast periods. This crate understands exactly
//! those two JSON documents, nothing more of the API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod model;

pub use client::WeatherClient;
pub use error::{Error, Result};
pub use model::ForecastPeriod;
