use chrono::Duration;
use crate::data::types::{Series, TrainingPeriod, TrainingWindow};

/// Trailing `period` of the series used for training.
///
/// Keeps every point at or after `latest - days * 24h`, boundary hour
/// included, so a dense series yields `days * 24 + 1` points. A series
/// shorter than the period is returned whole.
pub fn select_window(series: &Series, period: TrainingPeriod) -> TrainingWindow {
    let Some(end) = series.last_timestamp() else {
        return TrainingWindow { points: Vec::new() };
    };
    let cutoff = end - Duration::hours(period.days() * 24);

    // Timestamps are ordered, so the window is a suffix.
    let start = series.points.partition_point(|p| p.timestamp < cutoff);

    TrainingWindow {
        points: series.points[start..].to_vec(),
    }
}
