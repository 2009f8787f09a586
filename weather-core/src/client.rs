use std::sync::Arc;

use crate::{
    cache::ForecastCache,
    error::WeatherError,
    model::{ForecastRequest, WeatherResponse},
    provider::ForecastProvider,
};

/// Forecast lookups with per-request memoization.
///
/// The cache belongs to the client, so a fresh client starts cold.
#[derive(Debug)]
pub struct WeatherClient<P> {
    provider: P,
    cache: ForecastCache,
}

impl<P: ForecastProvider> WeatherClient<P> {
    pub fn new(provider: P) -> Self {
        Self::with_cache(provider, ForecastCache::new())
    }

    pub fn with_cache(provider: P, cache: ForecastCache) -> Self {
        Self { provider, cache }
    }

    /// Fetch the forecast for `request`, reusing an earlier response for an
    /// identical request.
    ///
    /// # Errors
    /// Whatever the provider reports. Failures are not cached.
    pub async fn fetch(
        &mut self,
        request: &ForecastRequest,
    ) -> Result<Arc<WeatherResponse>, WeatherError> {
        if let Some(hit) = self.cache.get(request) {
            tracing::debug!(
                latitude = request.latitude,
                longitude = request.longitude,
                "Forecast cache hit"
            );
            return Ok(hit);
        }

        tracing::debug!(
            latitude = request.latitude,
            longitude = request.longitude,
            "Forecast cache miss"
        );
        let response = Arc::new(self.provider.forecast(request).await?);
        self.cache.insert(request, Arc::clone(&response));
        Ok(response)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::model::{HourlyVariable, VariableSet};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ForecastProvider for CountingProvider {
        async fn forecast(
            &self,
            request: &ForecastRequest,
        ) -> Result<WeatherResponse, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TransportError::Malformed("boom".into()).into());
            }
            Ok(WeatherResponse {
                latitude: Some(request.latitude),
                longitude: Some(request.longitude),
                timezone: Some("GMT".into()),
                elevation: None,
                current: None,
                hourly: Vec::new(),
                raw: serde_json::json!({ "latitude": request.latitude }),
            })
        }
    }

    fn calls(client: &WeatherClient<CountingProvider>) -> usize {
        client.provider().calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn identical_requests_hit_the_network_once() {
        let mut client = WeatherClient::new(CountingProvider::default());
        let req = ForecastRequest::new(41.01, 28.95);

        let first = client.fetch(&req).await.unwrap();
        let second = client.fetch(&req).await.unwrap();

        assert_eq!(calls(&client), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn different_variables_or_coordinates_fetch_again() {
        let mut client = WeatherClient::new(CountingProvider::default());

        client.fetch(&ForecastRequest::new(41.01, 28.95)).await.unwrap();
        client
            .fetch(
                &ForecastRequest::new(41.01, 28.95)
                    .with_variables(VariableSet::new([HourlyVariable::Temperature])),
            )
            .await
            .unwrap();
        client.fetch(&ForecastRequest::new(48.85, 2.35)).await.unwrap();

        assert_eq!(calls(&client), 3);
        assert_eq!(client.cache().len(), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut client = WeatherClient::new(CountingProvider {
            fail: true,
            ..Default::default()
        });
        let req = ForecastRequest::new(41.01, 28.95);

        assert!(client.fetch(&req).await.unwrap_err().is_transport());
        assert!(client.fetch(&req).await.is_err());

        assert_eq!(calls(&client), 2);
        assert!(client.cache().is_empty());
    }
}
