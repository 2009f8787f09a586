//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and forecast clients for Open-Meteo, behind provider traits
//! - A per-client forecast cache
//! - Hourly data shaping: transposition, humidity lookup, chart windowing
//! - Search history and the display values of a lookup
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.
//! Nothing here knows about terminals or sessions; callers own that state.

pub mod cache;
pub mod client;
pub mod conditions;
pub mod config;
pub mod error;
pub mod history;
pub mod hourly;
pub mod humidity;
pub mod model;
pub mod provider;
pub mod report;
pub mod window;

pub use cache::ForecastCache;
pub use client::WeatherClient;
pub use config::{Config, Endpoints};
pub use error::{TransportError, WeatherError};
pub use history::History;
pub use humidity::resolve_humidity;
pub use model::{
    CurrentConditions, ForecastRequest, HourlySample, HourlySeries, HourlyVariable, Location,
    VariableSet, WeatherResponse,
};
pub use provider::{ForecastProvider, Geocoder, openmeteo::OpenMeteoProvider, provider_from_config};
pub use report::WeatherReport;
pub use window::window;
