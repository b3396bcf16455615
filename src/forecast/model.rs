use crate::data::types::TrainingWindow;
use crate::error::DashboardError;
use crate::forecast::types::{Components, ForecastPoint, ModelSummary};

/// Untrained forecasting backend.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &str;

    fn fit(&self, window: &TrainingWindow) -> Result<Box<dyn FittedModel>, DashboardError>;
}

/// A backend fitted on one training window.
pub trait FittedModel {
    /// In-sample values for every window timestamp, then `horizon_hours`
    /// hourly predictions past the window end.
    fn predict(&self, horizon_hours: usize) -> Result<Vec<ForecastPoint>, DashboardError>;

    /// Trend and seasonal sub-signals over the same timestamps as `predict`.
    fn decompose(&self, horizon_hours: usize) -> Components;

    fn summary(&self) -> ModelSummary;
}

/// Fit on the window, then forecast past its end.
pub fn train_and_forecast(
    forecaster: &dyn Forecaster,
    window: &TrainingWindow,
    horizon_hours: usize,
) -> Result<(Box<dyn FittedModel>, Vec<ForecastPoint>), DashboardError> {
    let fitted = forecaster.fit(window)?;
    let forecast = fitted.predict(horizon_hours)?;
    Ok((fitted, forecast))
}
