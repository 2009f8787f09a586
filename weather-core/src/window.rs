use chrono::NaiveDateTime;

use crate::model::HourlySample;

/// Default number of hourly points handed to the charts.
pub const DEFAULT_WINDOW: usize = 48;

/// Samples from `now` onward, at most `max_points` of them.
///
/// Without a `now` the series is taken from its start.
pub fn window(
    series: &[HourlySample],
    now: Option<NaiveDateTime>,
    max_points: usize,
) -> Vec<HourlySample> {
    series
        .iter()
        .filter(|s| now.is_none_or(|now| s.time >= now))
        .take(max_points)
        .cloned()
        .collect()
}

/// Whether any sample in the slice carries a humidity value.
pub fn has_humidity(samples: &[HourlySample]) -> bool {
    samples.iter().any(|s| s.relative_humidity.is_some())
}
