use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw model output for one hour, before partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Segment {
    Past,
    Future,
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Segment::Past => "Past Forecast",
            Segment::Future => "Future Forecast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRow {
    pub timestamp: DateTime<Utc>,
    pub predicted_value: f64,
    pub segment: Segment,
}

impl From<ForecastRow> for ForecastPoint {
    fn from(row: ForecastRow) -> Self {
        Self {
            timestamp: row.timestamp,
            predicted_value: row.predicted_value,
        }
    }
}

/// One named sub-signal of the decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub values: Vec<f64>,
}

/// Additive breakdown of a forecast, aligned with `timestamps`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Components {
    pub timestamps: Vec<DateTime<Utc>>,
    pub components: Vec<Component>,
}

/// What the fitted model reports about its training run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub name: String,
    pub seasonalities: Vec<String>,
    /// Mean absolute error of the fitted values over the training window.
    pub in_sample_mae: f64,
}
