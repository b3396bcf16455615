//! Display-ready data derived once per run.
//!
//! Charts borrow their points from here, so nothing is rebuilt per frame.

use chrono::{DateTime, Utc};
use crate::config::UiConfig;
use crate::forecast::types::{ForecastRow, Segment};
use crate::pipeline::Dashboard;

pub const SAMPLE_HEADERS: [&str; 2] = ["Datetime", "Value"];
pub const FORECAST_HEADERS: [&str; 2] = ["Datetime", "Forecast"];
pub const COMBINED_HEADERS: [&str; 3] = ["Datetime", "Forecast", "Type"];

pub struct DashboardView {
    pub history: Vec<(f64, f64)>,
    pub past: Vec<(f64, f64)>,
    pub future: Vec<(f64, f64)>,
    pub components: Vec<(String, Vec<(f64, f64)>)>,
    pub training_tail: Vec<[String; 2]>,
    pub forecast_tail: Vec<[String; 2]>,
    pub combined_tail: Vec<[String; 3]>,
}

impl DashboardView {
    pub fn build(dashboard: &Dashboard, ui: &UiConfig) -> Self {
        let history = dashboard
            .series
            .points
            .iter()
            .map(|p| (to_x(p.timestamp), p.value))
            .collect();

        let segment_points = |segment: Segment| -> Vec<(f64, f64)> {
            dashboard
                .rows
                .iter()
                .filter(|r| r.segment == segment)
                .map(|r| (to_x(r.timestamp), r.predicted_value))
                .collect()
        };

        let components = dashboard
            .components
            .components
            .iter()
            .map(|c| {
                let points = dashboard
                    .components
                    .timestamps
                    .iter()
                    .zip(&c.values)
                    .map(|(ts, v)| (to_x(*ts), *v))
                    .collect();
                (c.name.clone(), points)
            })
            .collect();

        Self {
            history,
            past: segment_points(Segment::Past),
            future: segment_points(Segment::Future),
            components,
            training_tail: tail(&dashboard.window.points, ui.sample_rows)
                .iter()
                .map(|p| [format_ts(p.timestamp), format!("{:.2}", p.value)])
                .collect(),
            forecast_tail: tail(&dashboard.forecast, ui.sample_rows)
                .iter()
                .map(|p| [format_ts(p.timestamp), format!("{:.2}", p.predicted_value)])
                .collect(),
            combined_tail: combined_rows(&dashboard.rows, ui.combined_rows),
        }
    }
}

/// Last `n` rows of the partitioned forecast, as table cells.
pub fn combined_rows(rows: &[ForecastRow], n: usize) -> Vec<[String; 3]> {
    tail(rows, n)
        .iter()
        .map(|r| {
            [
                format_ts(r.timestamp),
                format!("{:.2}", r.predicted_value),
                r.segment.label().to_string(),
            ]
        })
        .collect()
}

pub fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Chart x coordinate: hours since the Unix epoch.
pub fn to_x(ts: DateTime<Utc>) -> f64 {
    ts.timestamp() as f64 / 3600.0
}

/// Axis label for a chart x coordinate.
pub fn x_label(x: f64) -> String {
    DateTime::from_timestamp((x * 3600.0).round() as i64, 0)
        .map(|ts| ts.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use crate::data::types::{Series, TimeSeriesPoint, TrainingPeriod, TrainingWindow};
    use crate::forecast::partition::partition;
    use crate::forecast::types::{Component, Components, ForecastPoint, ModelSummary};

    fn dashboard() -> Dashboard {
        let t0 = Utc.with_ymd_and_hms(2026, 10, 11, 0, 0, 0).unwrap();
        let points: Vec<TimeSeriesPoint> = (0..168)
            .map(|h| TimeSeriesPoint { timestamp: t0 + Duration::hours(h), value: h as f64 })
            .collect();
        let window = TrainingWindow { points: points[144..].to_vec() };
        let window_end = window.end().unwrap();
        let forecast: Vec<ForecastPoint> = (144..168 + 48)
            .map(|h| ForecastPoint { timestamp: t0 + Duration::hours(h), predicted_value: h as f64 })
            .collect();
        let rows = partition(forecast.clone(), window_end);

        Dashboard {
            site: "youtube.com".to_string(),
            period: TrainingPeriod::OneDay,
            series: Arc::new(Series::new("youtube.com", points)),
            window,
            components: Components {
                timestamps: forecast.iter().map(|p| p.timestamp).collect(),
                components: vec![Component { name: "trend".to_string(), values: vec![1.0; 72] }],
            },
            forecast,
            rows,
            summary: ModelSummary {
                name: "test".to_string(),
                seasonalities: Vec::new(),
                in_sample_mae: 0.1,
            },
            elapsed: std::time::Duration::from_secs(1),
        }
    }

    #[test]
    fn test_view_tables_use_configured_row_counts() {
        let view = DashboardView::build(&dashboard(), &UiConfig::default());

        assert_eq!(view.training_tail.len(), 5);
        assert_eq!(view.forecast_tail.len(), 5);
        assert_eq!(view.combined_tail.len(), 60);
        assert_eq!(view.training_tail[4][0], "2026-10-17 23:00");
        assert_eq!(view.forecast_tail[4][0], "2026-10-19 23:00");
    }

    #[test]
    fn test_combined_tail_labels_segments() {
        let view = DashboardView::build(&dashboard(), &UiConfig::default());

        // 72 rows, last 60: 12 past then 48 future.
        assert_eq!(view.combined_tail[0][2], "Past Forecast");
        assert_eq!(view.combined_tail[11][2], "Past Forecast");
        assert_eq!(view.combined_tail[12][2], "Future Forecast");
        assert_eq!(view.combined_tail[59][2], "Future Forecast");
        assert_eq!(COMBINED_HEADERS[..2], ["Datetime", "Forecast"]);
    }

    #[test]
    fn test_chart_series_split_by_segment() {
        let view = DashboardView::build(&dashboard(), &UiConfig::default());

        assert_eq!(view.history.len(), 168);
        assert_eq!(view.past.len(), 24);
        assert_eq!(view.future.len(), 48);
        assert_eq!(view.components.len(), 1);
        assert!(view.past.last().unwrap().0 < view.future[0].0);
    }

    #[test]
    fn test_tail_shorter_than_n() {
        assert_eq!(tail(&[1, 2, 3], 5), &[1, 2, 3]);
        assert_eq!(tail(&[1, 2, 3], 2), &[2, 3]);
    }

    #[test]
    fn test_x_label_round_trips_hour() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 13, 0, 0).unwrap();
        assert_eq!(x_label(to_x(ts)), "10-18 13:00");
    }
}
