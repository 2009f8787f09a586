use chrono::NaiveDateTime;

use crate::model::HourlySample;

/// Relative humidity at `target`, taken from the hourly series.
///
/// An exact timestamp match wins. Otherwise the sample closest in time is
/// used, the earlier one in series order on a tie. Returns `None` for an
/// empty series or when the chosen sample carries no humidity.
pub fn resolve_humidity(target: NaiveDateTime, series: &[HourlySample]) -> Option<f64> {
    if let Some(exact) = series.iter().find(|s| s.time == target) {
        return exact.relative_humidity;
    }

    // min_by_key keeps the first of several equal minima.
    series
        .iter()
        .min_by_key(|s| (s.time - target).num_seconds().unsigned_abs())
        .and_then(|nearest| nearest.relative_humidity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample(time: NaiveDateTime, humidity: Option<f64>) -> HourlySample {
        HourlySample {
            relative_humidity: humidity,
            ..HourlySample::at(time)
        }
    }

    #[test]
    fn exact_match_returns_that_sample() {
        let series = vec![sample(at(0, 0), Some(50.0)), sample(at(1, 0), Some(55.0))];
        assert_eq!(resolve_humidity(at(1, 0), &series), Some(55.0));
    }

    #[test]
    fn falls_back_to_nearest_sample() {
        let series = vec![sample(at(0, 0), Some(40.0)), sample(at(2, 0), Some(60.0))];
        assert_eq!(resolve_humidity(at(1, 30), &series), Some(60.0));
        assert_eq!(resolve_humidity(at(0, 15), &series), Some(40.0));
    }

    #[test]
    fn target_outside_series_uses_closest_end() {
        let series = vec![sample(at(5, 0), Some(40.0)), sample(at(6, 0), Some(45.0))];
        assert_eq!(resolve_humidity(at(23, 0), &series), Some(45.0));
        assert_eq!(resolve_humidity(at(0, 0), &series), Some(40.0));
    }

    #[test]
    fn tie_goes_to_first_occurrence() {
        let series = vec![sample(at(0, 0), Some(40.0)), sample(at(2, 0), Some(60.0))];
        assert_eq!(resolve_humidity(at(1, 0), &series), Some(40.0));
    }

    #[test]
    fn empty_series_is_absent() {
        assert_eq!(resolve_humidity(at(1, 0), &[]), None);
    }

    #[test]
    fn series_without_humidity_is_absent() {
        let series = vec![sample(at(0, 0), None), sample(at(1, 0), None)];
        assert_eq!(resolve_humidity(at(0, 0), &series), None);
        assert_eq!(resolve_humidity(at(0, 20), &series), None);
    }
}
