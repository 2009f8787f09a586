//! Display values derived from one successful lookup.

use std::sync::Arc;

use crate::{
    conditions,
    humidity::resolve_humidity,
    model::{CurrentConditions, HourlySample, Location, WeatherResponse},
    window::{has_humidity, window},
};

/// Placeholder for a value the provider did not send.
pub const UNAVAILABLE: &str = "N/A";

/// Everything needed to render the summary cards and both charts.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub display_name: String,
    pub location: Location,
    pub current: Option<CurrentConditions>,
    pub humidity: Option<f64>,
    /// Hourly samples from now on, shared by the temperature and humidity charts.
    pub forecast: Vec<HourlySample>,
    pub response: Arc<WeatherResponse>,
}

impl WeatherReport {
    pub fn build(location: &Location, response: Arc<WeatherResponse>, max_points: usize) -> Self {
        let current = response.current.clone();
        let now = current.as_ref().and_then(|c| c.time);

        let humidity = match now {
            Some(now) if !response.hourly.is_empty() => resolve_humidity(now, &response.hourly),
            _ => None,
        };

        let forecast = window(&response.hourly, now, max_points);

        Self {
            display_name: location.display_name(),
            location: location.clone(),
            current,
            humidity,
            forecast,
            response,
        }
    }

    pub fn temperature(&self) -> String {
        self.current
            .as_ref()
            .and_then(|c| c.temperature)
            .map(|t| format!("{t:.1}°"))
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    pub fn humidity(&self) -> String {
        self.humidity
            .map(|h| format!("{h:.0}%"))
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    pub fn wind(&self) -> String {
        self.current
            .as_ref()
            .and_then(|c| c.windspeed)
            .map(|w| format!("{w:.1} km/h"))
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    pub fn condition(&self) -> String {
        self.current
            .as_ref()
            .and_then(|c| c.weather_code)
            .map(|code| conditions::describe(code).into_owned())
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    /// Whether the humidity chart has anything to draw.
    pub fn has_humidity_chart(&self) -> bool {
        has_humidity(&self.forecast)
    }

    /// The provider's body, pretty-printed for the raw inspector.
    pub fn raw_json(&self) -> String {
        serde_json::to_string_pretty(&self.response.raw)
            .unwrap_or_else(|_| self.response.raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hourly::parse_timestamp;

    fn location() -> Location {
        Location {
            name: "Istanbul".into(),
            country: Some("Türkiye".into()),
            latitude: 41.01,
            longitude: 28.95,
            admin1: None,
            timezone: None,
            elevation: None,
        }
    }

    fn sample(time: &str, temp: f64, humidity: Option<f64>) -> HourlySample {
        HourlySample {
            temperature: Some(temp),
            relative_humidity: humidity,
            ..HourlySample::at(parse_timestamp(time).unwrap())
        }
    }

    fn response(current: Option<CurrentConditions>, hourly: Vec<HourlySample>) -> Arc<WeatherResponse> {
        Arc::new(WeatherResponse {
            latitude: Some(41.0),
            longitude: Some(29.0),
            timezone: Some("Europe/Istanbul".into()),
            elevation: None,
            current,
            hourly,
            raw: serde_json::json!({ "latitude": 41.0 }),
        })
    }

    fn current_at(time: &str) -> CurrentConditions {
        CurrentConditions {
            time: Some(parse_timestamp(time).unwrap()),
            temperature: Some(18.5),
            windspeed: Some(12.0),
            winddirection: None,
            weather_code: Some(3),
        }
    }

    #[test]
    fn builds_cards_and_window_from_current_time() {
        let hourly = vec![
            sample("2024-05-01T12:00", 17.0, Some(70.0)),
            sample("2024-05-01T13:00", 18.5, Some(65.0)),
            sample("2024-05-01T14:00", 19.0, Some(60.0)),
        ];
        let report = WeatherReport::build(
            &location(),
            response(Some(current_at("2024-05-01T13:00")), hourly),
            48,
        );

        assert_eq!(report.display_name, "Istanbul, Türkiye");
        assert_eq!(report.temperature(), "18.5°");
        assert_eq!(report.humidity(), "65%");
        assert_eq!(report.wind(), "12.0 km/h");
        assert_eq!(report.condition(), "Overcast");
        assert_eq!(report.forecast.len(), 2);
        assert!(report.has_humidity_chart());
    }

    #[test]
    fn missing_values_render_unavailable() {
        let report = WeatherReport::build(&location(), response(None, Vec::new()), 48);

        assert_eq!(report.temperature(), UNAVAILABLE);
        assert_eq!(report.humidity(), UNAVAILABLE);
        assert_eq!(report.wind(), UNAVAILABLE);
        assert_eq!(report.condition(), UNAVAILABLE);
        assert!(report.forecast.is_empty());
        assert!(!report.has_humidity_chart());
    }

    #[test]
    fn without_current_time_window_starts_at_series_start() {
        let hourly = vec![
            sample("2024-05-01T12:00", 17.0, None),
            sample("2024-05-01T13:00", 18.5, None),
        ];
        let report = WeatherReport::build(&location(), response(None, hourly), 48);

        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.humidity, None);
        assert!(!report.has_humidity_chart());
    }

    #[test]
    fn whole_numbers_keep_one_decimal() {
        let current = CurrentConditions {
            temperature: Some(18.0),
            windspeed: Some(7.0),
            ..current_at("2024-05-01T13:00")
        };
        let report = WeatherReport::build(&location(), response(Some(current), Vec::new()), 48);

        assert_eq!(report.temperature(), "18.0°");
        assert_eq!(report.wind(), "7.0 km/h");
    }

    #[test]
    fn raw_json_is_pretty_printed() {
        let report = WeatherReport::build(&location(), response(None, Vec::new()), 48);
        assert!(report.raw_json().contains("\"latitude\": 41.0"));
    }
}
