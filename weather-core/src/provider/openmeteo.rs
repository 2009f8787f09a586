use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{TransportError, WeatherError, truncate_body},
    hourly::{HourlyColumns, parse_timestamp},
    model::{CurrentConditions, ForecastRequest, Location, WeatherResponse},
};

use super::{ForecastProvider, Geocoder};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Only the best match is ever used.
const GEOCODE_COUNT: u8 = 1;
const USER_AGENT: &str = concat!("weather-cli/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo geocoding and forecast APIs. Free, no API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoProvider {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Self::with_endpoints(GEOCODING_URL, FORECAST_URL, timeout)
    }

    pub fn with_endpoints(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        })
    }

    pub fn geocoding_url(&self) -> &str {
        &self.geocoding_url
    }

    pub fn forecast_url(&self) -> &str {
        &self.forecast_url
    }

    /// GET `url` and return the body of a 2xx response.
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, WeatherError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status,
                body: truncate_body(&body),
            }
            .into());
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    #[serde(default)]
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
    elevation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    time: Option<String>,
    temperature: Option<f64>,
    windspeed: Option<f64>,
    winddirection: Option<f64>,
    weathercode: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    elevation: Option<f64>,
    current_weather: Option<OmCurrentWeather>,
    hourly: Option<HourlyColumns>,
}

impl OmPlace {
    fn into_location(self, query: &str) -> Result<Location, WeatherError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(WeatherError::malformed(format!(
                "geocoding result for '{query}' has non-finite coordinates"
            )));
        }

        Ok(Location {
            name: self.name.unwrap_or_else(|| query.to_string()),
            country: self.country,
            latitude: self.latitude,
            longitude: self.longitude,
            admin1: self.admin1,
            timezone: self.timezone,
            elevation: self.elevation,
        })
    }
}

impl OmCurrentWeather {
    fn into_conditions(self) -> Result<CurrentConditions, WeatherError> {
        let time = self.time.as_deref().map(parse_timestamp).transpose()?;

        Ok(CurrentConditions {
            time,
            temperature: self.temperature,
            windspeed: self.windspeed,
            winddirection: self.winddirection,
            weather_code: self.weathercode,
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoProvider {
    #[instrument(skip(self), level = "info")]
    async fn resolve(&self, query: &str) -> Result<Location, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::InvalidRequest(
                "location query must not be empty".to_string(),
            ));
        }

        tracing::debug!(url = %self.geocoding_url, "Sending geocoding request");
        let body = self
            .get_text(
                &self.geocoding_url,
                &[("name", query.to_string()), ("count", GEOCODE_COUNT.to_string())],
            )
            .await?;

        let parsed: OmGeocodingResponse = serde_json::from_str(&body)?;

        let place = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::NotFound {
                query: query.to_string(),
            })?;

        let location = place.into_location(query)?;
        tracing::info!(
            name = %location.display_name(),
            latitude = location.latitude,
            longitude = location.longitude,
            "Resolved location"
        );
        Ok(location)
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    #[instrument(skip(self), level = "info")]
    async fn forecast(&self, request: &ForecastRequest) -> Result<WeatherResponse, WeatherError> {
        if request.variables.is_empty() {
            return Err(WeatherError::InvalidRequest(
                "at least one hourly variable is required".to_string(),
            ));
        }

        tracing::debug!(url = %self.forecast_url, "Sending forecast request");
        let body = self
            .get_text(
                &self.forecast_url,
                &[
                    ("latitude", request.latitude.to_string()),
                    ("longitude", request.longitude.to_string()),
                    ("current_weather", "true".to_string()),
                    ("hourly", request.variables.to_query()),
                    ("timezone", request.timezone.clone()),
                ],
            )
            .await?;

        let raw: serde_json::Value = serde_json::from_str(&body)?;
        let parsed: OmForecastResponse = serde_json::from_value(raw.clone())?;

        let current = parsed
            .current_weather
            .map(OmCurrentWeather::into_conditions)
            .transpose()?;
        let hourly = parsed.hourly.unwrap_or_default().into_series()?;

        tracing::debug!(samples = hourly.len(), "Parsed forecast response");

        Ok(WeatherResponse {
            latitude: parsed.latitude,
            longitude: parsed.longitude,
            timezone: parsed.timezone,
            elevation: parsed.elevation,
            current,
            hourly,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: Option<&str>) -> OmPlace {
        OmPlace {
            name: name.map(str::to_string),
            latitude: 41.01,
            longitude: 28.95,
            country: Some("Türkiye".into()),
            admin1: Some("Istanbul".into()),
            timezone: Some("Europe/Istanbul".into()),
            elevation: Some(39.0),
        }
    }

    #[test]
    fn place_keeps_provider_name() {
        let loc = place(Some("Istanbul")).into_location("istanbul").unwrap();
        assert_eq!(loc.name, "Istanbul");
        assert_eq!(loc.display_name(), "Istanbul, Türkiye");
    }

    #[test]
    fn place_without_name_falls_back_to_query() {
        let loc = place(None).into_location("istanbul").unwrap();
        assert_eq!(loc.name, "istanbul");
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let mut bad = place(Some("Nowhere"));
        bad.latitude = f64::NAN;

        let err = bad.into_location("nowhere").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn current_weather_time_is_parsed() {
        let current: OmCurrentWeather = serde_json::from_value(serde_json::json!({
            "time": "2024-05-01T13:00",
            "temperature": 18.4,
            "windspeed": 9.7,
            "winddirection": 240,
            "weathercode": 2
        }))
        .unwrap();

        let conditions = current.into_conditions().unwrap();
        assert!(conditions.time.is_some());
        assert_eq!(conditions.weather_code, Some(2));
        assert_eq!(conditions.winddirection, Some(240.0));
    }

    #[test]
    fn current_weather_may_omit_everything() {
        let current: OmCurrentWeather = serde_json::from_value(serde_json::json!({})).unwrap();
        let conditions = current.into_conditions().unwrap();

        assert_eq!(conditions.time, None);
        assert_eq!(conditions.temperature, None);
    }

    #[tokio::test]
    async fn blank_query_is_rejected_without_a_request() {
        // Unroutable endpoint: the call must fail before any I/O.
        let provider = OpenMeteoProvider::with_endpoints(
            "http://127.0.0.1:9/search",
            "http://127.0.0.1:9/forecast",
            Duration::from_secs(1),
        )
        .unwrap();

        let err = provider.resolve("   ").await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidRequest(_)));
    }
}
