use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timezone mode that lets the provider infer the zone from the coordinates.
pub const AUTO_TIMEZONE: &str = "auto";

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// First-level administrative area, e.g. a state or province.
    pub admin1: Option<String>,
    pub timezone: Option<String>,
    pub elevation: Option<f64>,
}

impl Location {
    /// "Name, Country", or just the name when the country is unknown.
    pub fn display_name(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Hourly variables understood by the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HourlyVariable {
    #[serde(rename = "temperature_2m")]
    Temperature,
    #[serde(rename = "relativehumidity_2m", alias = "relative_humidity_2m")]
    RelativeHumidity,
    #[serde(rename = "apparent_temperature")]
    ApparentTemperature,
    #[serde(rename = "windspeed_10m", alias = "wind_speed_10m")]
    WindSpeed,
    #[serde(rename = "weathercode", alias = "weather_code")]
    WeatherCode,
}

impl HourlyVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            HourlyVariable::Temperature => "temperature_2m",
            HourlyVariable::RelativeHumidity => "relativehumidity_2m",
            HourlyVariable::ApparentTemperature => "apparent_temperature",
            HourlyVariable::WindSpeed => "windspeed_10m",
            HourlyVariable::WeatherCode => "weathercode",
        }
    }

    pub const fn all() -> &'static [HourlyVariable] {
        &[
            HourlyVariable::Temperature,
            HourlyVariable::RelativeHumidity,
            HourlyVariable::ApparentTemperature,
            HourlyVariable::WindSpeed,
            HourlyVariable::WeatherCode,
        ]
    }
}

impl fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HourlyVariable {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "temperature_2m" => Ok(HourlyVariable::Temperature),
            "relativehumidity_2m" | "relative_humidity_2m" => Ok(HourlyVariable::RelativeHumidity),
            "apparent_temperature" => Ok(HourlyVariable::ApparentTemperature),
            "windspeed_10m" | "wind_speed_10m" => Ok(HourlyVariable::WindSpeed),
            "weathercode" | "weather_code" => Ok(HourlyVariable::WeatherCode),
            _ => Err(anyhow::anyhow!(
                "Unknown hourly variable '{value}'. Supported: temperature_2m, relativehumidity_2m, \
                 apparent_temperature, windspeed_10m, weathercode."
            )),
        }
    }
}

/// Sorted, de-duplicated set of hourly variables.
///
/// Ordering is fixed so that two requests for the same variables always build
/// the same query string and the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(BTreeSet<HourlyVariable>);

impl VariableSet {
    pub fn new(vars: impl IntoIterator<Item = HourlyVariable>) -> Self {
        Self(vars.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, var: HourlyVariable) -> bool {
        self.0.contains(&var)
    }

    pub fn iter(&self) -> impl Iterator<Item = HourlyVariable> + '_ {
        self.0.iter().copied()
    }

    /// Comma-joined form used for the `hourly` query parameter.
    pub fn to_query(&self) -> String {
        self.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",")
    }
}

impl Default for VariableSet {
    fn default() -> Self {
        Self::new(HourlyVariable::all().iter().copied())
    }
}

impl FromIterator<HourlyVariable> for VariableSet {
    fn from_iter<I: IntoIterator<Item = HourlyVariable>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Parameters of one forecast lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub variables: VariableSet,
}

impl ForecastRequest {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timezone: AUTO_TIMEZONE.to_string(),
            variables: VariableSet::default(),
        }
    }

    pub fn for_location(location: &Location) -> Self {
        Self::new(location.latitude, location.longitude)
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_variables(mut self, variables: VariableSet) -> Self {
        self.variables = variables;
        self
    }
}

/// The provider's "current weather" snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub time: Option<NaiveDateTime>,
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddirection: Option<f64>,
    pub weather_code: Option<i32>,
}

/// One row of the hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub weather_code: Option<i32>,
}

impl HourlySample {
    /// A sample with nothing but its timestamp.
    pub fn at(time: NaiveDateTime) -> Self {
        Self {
            time,
            temperature: None,
            relative_humidity: None,
            apparent_temperature: None,
            windspeed: None,
            weather_code: None,
        }
    }
}

pub type HourlySeries = Vec<HourlySample>;

/// A normalized forecast response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub elevation: Option<f64>,
    pub current: Option<CurrentConditions>,
    pub hourly: HourlySeries,
    /// The body exactly as the provider sent it.
    pub raw: serde_json::Value,
}
