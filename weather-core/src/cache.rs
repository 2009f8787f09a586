use std::{collections::HashMap, sync::Arc};

use crate::model::{ForecastRequest, VariableSet, WeatherResponse};

/// Identity of a forecast request.
///
/// Coordinates are compared bit-for-bit, so only an identical request hits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    latitude: u64,
    longitude: u64,
    timezone: String,
    variables: VariableSet,
}

impl From<&ForecastRequest> for CacheKey {
    fn from(req: &ForecastRequest) -> Self {
        Self {
            latitude: req.latitude.to_bits(),
            longitude: req.longitude.to_bits(),
            timezone: req.timezone.clone(),
            variables: req.variables.clone(),
        }
    }
}

/// Forecast responses kept for the lifetime of the owning client.
///
/// Unbounded, no expiry: a lookup session is short and a stale forecast is
/// acceptable there.
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: HashMap<CacheKey, Arc<WeatherResponse>>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request: &ForecastRequest) -> Option<Arc<WeatherResponse>> {
        self.entries.get(&CacheKey::from(request)).cloned()
    }

    pub fn insert(&mut self, request: &ForecastRequest, response: Arc<WeatherResponse>) {
        self.entries.insert(CacheKey::from(request), response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HourlyVariable;

    fn response() -> Arc<WeatherResponse> {
        Arc::new(WeatherResponse {
            latitude: Some(41.0),
            longitude: Some(29.0),
            timezone: None,
            elevation: None,
            current: None,
            hourly: Vec::new(),
            raw: serde_json::json!({}),
        })
    }

    #[test]
    fn identical_request_hits() {
        let mut cache = ForecastCache::new();
        let req = ForecastRequest::new(41.0, 29.0);
        cache.insert(&req, response());

        assert!(cache.get(&ForecastRequest::new(41.0, 29.0)).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn any_differing_field_misses() {
        let mut cache = ForecastCache::new();
        cache.insert(&ForecastRequest::new(41.0, 29.0), response());

        assert!(cache.get(&ForecastRequest::new(41.0, 29.5)).is_none());
        assert!(cache.get(&ForecastRequest::new(41.5, 29.0)).is_none());
        assert!(
            cache
                .get(&ForecastRequest::new(41.0, 29.0).with_timezone("GMT"))
                .is_none()
        );
        assert!(
            cache
                .get(
                    &ForecastRequest::new(41.0, 29.0)
                        .with_variables(VariableSet::new([HourlyVariable::Temperature]))
                )
                .is_none()
        );
    }
}
