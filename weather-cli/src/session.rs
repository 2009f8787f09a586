//! State that lives for one run of the tool: history and the forecast cache.

use std::collections::HashMap;

use weather_core::{
    Config, ForecastProvider, ForecastRequest, Geocoder, History, Location, OpenMeteoProvider,
    WeatherClient, WeatherError, WeatherReport, provider_from_config,
};

/// Why a search produced no report.
#[derive(Debug)]
pub enum SearchFailure {
    EmptyQuery,
    NotInHistory(String),
    Geocoding(WeatherError),
    Weather(WeatherError),
}

impl std::fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchFailure::EmptyQuery => f.write_str("Enter a city name to search."),
            SearchFailure::NotInHistory(name) => write!(f, "'{name}' is not in the search history."),
            SearchFailure::Geocoding(err) if err.is_not_found() => f.write_str("Location not found."),
            SearchFailure::Geocoding(err) => write!(f, "Geocoding failed: {err}"),
            SearchFailure::Weather(err) => write!(f, "Weather API error: {err}"),
        }
    }
}

impl std::error::Error for SearchFailure {}

/// One user's run of the tool.
#[derive(Debug)]
pub struct Session<P = OpenMeteoProvider> {
    geocoder: P,
    weather: WeatherClient<P>,
    history: History,
    /// Resolved place behind each history entry, so a pick skips geocoding.
    places: HashMap<String, Location>,
    config: Config,
}

impl Session<OpenMeteoProvider> {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(&config)?;
        Ok(Self::new(provider.clone(), provider, config))
    }
}

impl<P: Geocoder + ForecastProvider> Session<P> {
    pub fn new(geocoder: P, forecast: P, config: Config) -> Self {
        Self {
            geocoder,
            weather: WeatherClient::new(forecast),
            history: History::new(),
            places: HashMap::new(),
            config,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Geocode `query`, remember it, fetch its forecast and derive the report.
    ///
    /// The display name enters the history as soon as the place resolves,
    /// even if the forecast lookup then fails.
    pub async fn search(
        &mut self,
        query: &str,
        max_points: usize,
    ) -> Result<WeatherReport, SearchFailure> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchFailure::EmptyQuery);
        }

        let location = self
            .geocoder
            .resolve(query)
            .await
            .map_err(SearchFailure::Geocoding)?;

        let display_name = location.display_name();
        if self.history.record(display_name.clone()) {
            self.places.insert(display_name, location.clone());
        }

        self.forecast_for(&location, max_points).await
    }

    /// Show an earlier search again, reusing its resolved place.
    pub async fn revisit(
        &mut self,
        display_name: &str,
        max_points: usize,
    ) -> Result<WeatherReport, SearchFailure> {
        let location = self
            .places
            .get(display_name)
            .cloned()
            .ok_or_else(|| SearchFailure::NotInHistory(display_name.to_string()))?;

        self.forecast_for(&location, max_points).await
    }

    async fn forecast_for(
        &mut self,
        location: &Location,
        max_points: usize,
    ) -> Result<WeatherReport, SearchFailure> {
        let request = ForecastRequest::for_location(location)
            .with_timezone(self.config.timezone.clone())
            .with_variables(self.config.hourly.clone());

        let response = self
            .weather
            .fetch(&request)
            .await
            .map_err(SearchFailure::Weather)?;

        Ok(WeatherReport::build(location, response, max_points))
    }
}
