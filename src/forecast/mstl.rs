//! Forecasting backend on top of `augurs`.
//!
//! Windows spanning at least two seasons are fitted with MSTL (seasonal-trend
//! decomposition with a daily period) using AutoETS for the deseasonalized
//! trend. Shorter windows fall back to a non-seasonal AutoETS. A second,
//! non-seasonal AutoETS fit provides the trend line shown in the breakdown;
//! the seasonal component is what the seasonal model adds on top of it.

use augurs::ets::AutoETS;
use augurs::mstl::MSTLModel;
use augurs::prelude::*;
use chrono::{DateTime, Duration, Utc};
use std::fmt::Display;
use tracing::info;
use crate::config::ModelConfig;
use crate::data::types::TrainingWindow;
use crate::error::DashboardError;
use crate::forecast::model::{FittedModel, Forecaster};
use crate::forecast::types::{Component, Components, ForecastPoint, ModelSummary};

pub struct MstlForecaster {
    config: ModelConfig,
}

impl MstlForecaster {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    fn validate(&self, window: &TrainingWindow) -> Result<(), DashboardError> {
        if window.len() < self.config.min_points {
            return Err(DashboardError::TrainingFailed(format!(
                "need at least {} hourly points, got {}",
                self.config.min_points,
                window.len()
            )));
        }

        if window.points.iter().any(|p| !p.value.is_finite()) {
            return Err(DashboardError::TrainingFailed(
                "window contains non-numeric values".to_string(),
            ));
        }

        let first = window.points[0].value;
        if window.points.iter().all(|p| p.value == first) {
            return Err(DashboardError::TrainingFailed(format!(
                "window is constant at {}, nothing to learn",
                first
            )));
        }

        Ok(())
    }

    fn is_seasonal(&self, len: usize) -> bool {
        len >= 2 * self.config.seasonal_period_hours
    }
}

impl Forecaster for MstlForecaster {
    fn name(&self) -> &str {
        "MSTL + AutoETS"
    }

    fn fit(&self, window: &TrainingWindow) -> Result<Box<dyn FittedModel>, DashboardError> {
        self.validate(window)?;

        let values = window.values();
        let history: Vec<DateTime<Utc>> = window.points.iter().map(|p| p.timestamp).collect();

        let trend = AutoETS::non_seasonal()
            .fit(&values)
            .map_err(|e| training_failed("AutoETS", e))?;

        if !self.is_seasonal(values.len()) {
            info!(
                "🤖 {} points is under two {}h seasons, fitting non-seasonal AutoETS",
                values.len(),
                self.config.seasonal_period_hours
            );
            return FittedAugurs::trend_only(trend, history, &values, "AutoETS");
        }

        info!(
            "🤖 Fitting MSTL (period {}h) + AutoETS on {} points",
            self.config.seasonal_period_hours,
            values.len()
        );
        let seasonal = MSTLModel::new(
            vec![self.config.seasonal_period_hours],
            AutoETS::non_seasonal().into_trend_model(),
        )
        .fit(&values)
        .map_err(|e| training_failed("MSTL", e))?;

        FittedAugurs::seasonal(seasonal, trend, history, &values, self.name())
    }
}

fn training_failed(stage: &str, err: impl Display) -> DashboardError {
    DashboardError::TrainingFailed(format!("{} fit error: {}", stage, err))
}

fn prediction_failed(stage: &str, err: impl Display) -> DashboardError {
    DashboardError::TrainingFailed(format!("{} predict error: {}", stage, err))
}

/// A fitted `augurs` model plus, for seasonal fits, the non-seasonal trend.
struct FittedAugurs<P, T> {
    model: P,
    trend: Option<T>,
    history: Vec<DateTime<Utc>>,
    summary: ModelSummary,
}

impl<P> FittedAugurs<P, P>
where
    P: Predict + 'static,
    P::Error: Display,
{
    fn trend_only(
        model: P,
        history: Vec<DateTime<Utc>>,
        values: &[f64],
        name: &str,
    ) -> Result<Box<dyn FittedModel>, DashboardError> {
        Self::build(model, None, history, values, name, Vec::new())
    }
}

impl<P, T> FittedAugurs<P, T>
where
    P: Predict + 'static,
    P::Error: Display,
    T: Predict + 'static,
    T::Error: Display,
{
    fn seasonal(
        model: P,
        trend: T,
        history: Vec<DateTime<Utc>>,
        values: &[f64],
        name: &str,
    ) -> Result<Box<dyn FittedModel>, DashboardError> {
        Self::build(model, Some(trend), history, values, name, vec!["daily".to_string()])
    }

    fn build(
        model: P,
        trend: Option<T>,
        history: Vec<DateTime<Utc>>,
        values: &[f64],
        name: &str,
        seasonalities: Vec<String>,
    ) -> Result<Box<dyn FittedModel>, DashboardError> {
        let in_sample = model
            .predict_in_sample(None::<f64>)
            .map_err(|e| prediction_failed(name, e))?
            .point;
        if in_sample.len() != values.len() {
            return Err(DashboardError::TrainingFailed(format!(
                "{} returned {} fitted values for {} points",
                name,
                in_sample.len(),
                values.len()
            )));
        }

        let in_sample_mae = in_sample
            .iter()
            .zip(values)
            .map(|(fit, y)| (fit - y).abs())
            .sum::<f64>()
            / values.len() as f64;
        info!("✅ {} fitted, in-sample MAE {:.3}", name, in_sample_mae);

        Ok(Box::new(Self {
            model,
            trend,
            history,
            summary: ModelSummary {
                name: name.to_string(),
                seasonalities,
                in_sample_mae,
            },
        }))
    }

    fn timestamps(&self, horizon_hours: usize) -> Vec<DateTime<Utc>> {
        let mut timestamps = self.history.clone();
        if let Some(&end) = self.history.last() {
            timestamps.extend((1..=horizon_hours as i64).map(|h| end + Duration::hours(h)));
        }
        timestamps
    }

    /// In-sample values followed by `horizon_hours` forecasts.
    fn path<M>(model: &M, horizon_hours: usize, name: &str) -> Result<Vec<f64>, DashboardError>
    where
        M: Predict,
        M::Error: Display,
    {
        let mut values = model
            .predict_in_sample(None::<f64>)
            .map_err(|e| prediction_failed(name, e))?
            .point;
        if horizon_hours > 0 {
            let future = model
                .predict(horizon_hours, None::<f64>)
                .map_err(|e| prediction_failed(name, e))?
                .point;
            values.extend(future);
        }
        Ok(values)
    }
}

impl<P, T> FittedModel for FittedAugurs<P, T>
where
    P: Predict + 'static,
    P::Error: Display,
    T: Predict + 'static,
    T::Error: Display,
{
    fn predict(&self, horizon_hours: usize) -> Result<Vec<ForecastPoint>, DashboardError> {
        let timestamps = self.timestamps(horizon_hours);
        let values = Self::path(&self.model, horizon_hours, &self.summary.name)?;
        if values.len() != timestamps.len() {
            return Err(DashboardError::TrainingFailed(format!(
                "{} returned {} values for {} timestamps",
                self.summary.name,
                values.len(),
                timestamps.len()
            )));
        }

        Ok(timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, predicted_value)| ForecastPoint { timestamp, predicted_value })
            .collect())
    }

    fn decompose(&self, horizon_hours: usize) -> Components {
        let timestamps = self.timestamps(horizon_hours);
        let Ok(total) = Self::path(&self.model, horizon_hours, &self.summary.name) else {
            return Components::default();
        };

        let trend = match &self.trend {
            Some(trend) => match Self::path(trend, horizon_hours, "AutoETS") {
                Ok(values) if values.len() == total.len() => values,
                _ => return Components::default(),
            },
            None => total.clone(),
        };

        let mut components = vec![Component { name: "trend".to_string(), values: trend.clone() }];
        for name in &self.summary.seasonalities {
            components.push(Component {
                name: name.clone(),
                values: total.iter().zip(&trend).map(|(t, tr)| t - tr).collect(),
            });
        }

        Components { timestamps, components }
    }

    fn summary(&self) -> ModelSummary {
        self.summary.clone()
    }
}
