use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};

/// One hour of interest for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Observation as reported by the provider, before resampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub is_partial: bool,
}

/// Dense hourly series for one keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub keyword: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl Series {
    pub fn new(keyword: impl Into<String>, points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            keyword: keyword.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// True if every consecutive pair is exactly one hour apart.
    pub fn is_hourly_dense(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == Duration::hours(1))
    }
}

/// Lookback choices offered for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrainingPeriod {
    #[default]
    OneDay,
    ThreeDays,
    SevenDays,
}

impl TrainingPeriod {
    pub fn all() -> &'static [TrainingPeriod] {
        &[
            TrainingPeriod::OneDay,
            TrainingPeriod::ThreeDays,
            TrainingPeriod::SevenDays,
        ]
    }

    pub fn days(&self) -> i64 {
        match self {
            TrainingPeriod::OneDay => 1,
            TrainingPeriod::ThreeDays => 3,
            TrainingPeriod::SevenDays => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrainingPeriod::OneDay => "Last 1 Day",
            TrainingPeriod::ThreeDays => "Last 3 Days",
            TrainingPeriod::SevenDays => "Last 7 Days",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TrainingPeriod::OneDay => TrainingPeriod::ThreeDays,
            TrainingPeriod::ThreeDays => TrainingPeriod::SevenDays,
            TrainingPeriod::SevenDays => TrainingPeriod::OneDay,
        }
    }
}

/// Trailing slice of a series used to fit the model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingWindow {
    pub points: Vec<TimeSeriesPoint>,
}

impl TrainingWindow {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
