//! Turning the provider's columnar `hourly` block into rows.
//!
//! Open-Meteo sends one array per variable plus a `time` array, all of the same
//! length; index `i` across every array describes one hour.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{HourlySample, HourlySeries},
};

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a provider timestamp.
///
/// Accepts the provider's local `YYYY-MM-DDTHH:MM` form (with or without
/// seconds) and full RFC 3339 stamps, which are reduced to their local
/// wall-clock time.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, WeatherError> {
    let value = value.trim();

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .map_err(|_| WeatherError::malformed(format!("unrecognised timestamp '{value}'")))
}

/// The `hourly` object as sent on the wire.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HourlyColumns {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "relative_humidity_2m")]
    pub relativehumidity_2m: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub apparent_temperature: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "wind_speed_10m")]
    pub windspeed_10m: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Option<Vec<Option<i32>>>,
}

impl HourlyColumns {
    /// Transpose into one sample per timestamp.
    ///
    /// Every present column must be exactly as long as `time`; a column the
    /// provider left out leaves that field `None` on every sample.
    pub fn into_series(self) -> Result<HourlySeries, WeatherError> {
        let len = self.time.len();

        check_len("temperature_2m", self.temperature_2m.as_deref(), len)?;
        check_len("relativehumidity_2m", self.relativehumidity_2m.as_deref(), len)?;
        check_len("apparent_temperature", self.apparent_temperature.as_deref(), len)?;
        check_len("windspeed_10m", self.windspeed_10m.as_deref(), len)?;
        check_len("weathercode", self.weathercode.as_deref(), len)?;

        self.time
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                Ok(HourlySample {
                    time: parse_timestamp(raw)?,
                    temperature: cell(&self.temperature_2m, i),
                    relative_humidity: cell(&self.relativehumidity_2m, i),
                    apparent_temperature: cell(&self.apparent_temperature, i),
                    windspeed: cell(&self.windspeed_10m, i),
                    weather_code: cell(&self.weathercode, i),
                })
            })
            .collect()
    }
}

fn check_len<T>(name: &str, column: Option<&[T]>, expected: usize) -> Result<(), WeatherError> {
    match column {
        Some(values) if values.len() != expected => Err(WeatherError::malformed(format!(
            "hourly column '{name}' has {} values but 'time' has {expected}",
            values.len()
        ))),
        _ => Ok(()),
    }
}

fn cell<T: Copy>(column: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    column.as_ref().and_then(|values| values.get(i).copied().flatten())
}
