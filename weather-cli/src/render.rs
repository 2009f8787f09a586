//! Human-friendly output: summary cards and sparkline charts.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use weather_core::{HourlySample, WeatherReport};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const TIME_FMT: &str = "%a %H:%M";

/// Full report: header, four cards and both charts.
pub fn report(report: &WeatherReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Current weather: {}", report.display_name);
    let _ = writeln!(
        out,
        "  ({:.4}, {:.4}{})",
        report.location.latitude,
        report.location.longitude,
        report
            .response
            .timezone
            .as_deref()
            .map(|tz| format!(", {tz}"))
            .unwrap_or_default()
    );
    out.push('\n');

    let cards = [
        ("Temperature (°C)", report.temperature()),
        ("Humidity (%)", report.humidity()),
        ("Wind (km/h)", report.wind()),
        ("Conditions", report.condition()),
    ];
    for (label, value) in cards {
        let _ = writeln!(out, "  {label:<18}{value}");
    }

    if report.forecast.is_empty() {
        return out;
    }

    out.push('\n');
    out.push_str(&chart(
        "Temperature (next hours)",
        "°C",
        &report.forecast,
        |s| s.temperature,
    ));

    out.push('\n');
    if report.has_humidity_chart() {
        out.push_str(&chart(
            "Relative Humidity (next hours)",
            "%",
            &report.forecast,
            |s| s.relative_humidity,
        ));
    } else {
        out.push_str("Hourly humidity data not available for this location.\n");
    }

    out
}

/// One titled sparkline with its range and time span.
pub fn chart(
    title: &str,
    unit: &str,
    samples: &[HourlySample],
    field: impl Fn(&HourlySample) -> Option<f64>,
) -> String {
    let values: Vec<Option<f64>> = samples.iter().map(field).collect();
    let mut out = String::new();

    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "  {}", sparkline(&values));

    if let Some((min, max)) = range(&values) {
        let _ = writeln!(out, "  min {min:.1}{unit}  max {max:.1}{unit}");
    }
    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        let _ = writeln!(
            out,
            "  {} → {} ({} h)",
            fmt_time(first.time),
            fmt_time(last.time),
            samples.len()
        );
    }

    out
}

/// One block character per value, scaled between the series min and max.
/// Missing values become spaces.
pub fn sparkline(values: &[Option<f64>]) -> String {
    let Some((min, max)) = range(values) else {
        return " ".repeat(values.len());
    };
    let span = max - min;

    values
        .iter()
        .map(|v| match v {
            None => ' ',
            Some(_) if span == 0.0 => BARS[BARS.len() / 2],
            Some(v) => {
                let idx = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

fn range(values: &[Option<f64>]) -> Option<(f64, f64)> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn fmt_time(ts: NaiveDateTime) -> String {
    ts.format(TIME_FMT).to_string()
}
