//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather current-conditions client
//! - The response schema and the observations derived from it
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;

pub use config::Config;
pub use error::WeatherError;
pub use model::{Coordinates, OpenWeatherResponse, Units};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use report::{ComfortBucket, Report};
