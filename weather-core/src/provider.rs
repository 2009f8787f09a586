use crate::{
    Config,
    error::WeatherError,
    model::{ForecastRequest, Location, WeatherResponse},
    provider::openmeteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// Resolves free text to a single best-match place.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Look up `query`.
    ///
    /// # Errors
    /// `InvalidRequest` for a blank query, `NotFound` when the provider has no
    /// match, `Transport` for anything that went wrong on the wire.
    async fn resolve(&self, query: &str) -> Result<Location, WeatherError>;
}

/// Fetches current conditions and an hourly series for a coordinate pair.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, request: &ForecastRequest) -> Result<WeatherResponse, WeatherError>;
}

/// Construct the Open-Meteo provider from config.
pub fn provider_from_config(config: &Config) -> Result<OpenMeteoProvider, WeatherError> {
    OpenMeteoProvider::with_endpoints(
        &config.endpoints.geocoding,
        &config.endpoints.forecast,
        config.timeout(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config_uses_public_endpoints() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg).expect("client should build");

        assert_eq!(provider.geocoding_url(), openmeteo::GEOCODING_URL);
        assert_eq!(provider.forecast_url(), openmeteo::FORECAST_URL);
    }

    #[test]
    fn provider_from_config_honours_endpoint_overrides() {
        let mut cfg = Config::default();
        cfg.endpoints.geocoding = "http://localhost:9000/search".into();

        let provider = provider_from_config(&cfg).expect("client should build");
        assert_eq!(provider.geocoding_url(), "http://localhost:9000/search");
    }
}
