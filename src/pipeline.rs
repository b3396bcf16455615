use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use crate::data::fetcher::Fetcher;
use crate::data::types::{Series, TrainingPeriod, TrainingWindow};
use crate::error::DashboardError;
use crate::forecast::model::{train_and_forecast, Forecaster};
use crate::forecast::partition::{count_segment, partition};
use crate::forecast::types::{Components, ForecastPoint, ForecastRow, ModelSummary, Segment};
use crate::forecast::window::select_window;

/// Everything the dashboard shows for one run.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub site: String,
    pub period: TrainingPeriod,
    pub series: Arc<Series>,
    pub window: TrainingWindow,
    pub forecast: Vec<ForecastPoint>,
    pub rows: Vec<ForecastRow>,
    pub components: Components,
    pub summary: ModelSummary,
    pub elapsed: Duration,
}

pub struct Pipeline {
    fetcher: Fetcher,
    forecaster: Box<dyn Forecaster>,
    horizon_hours: usize,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, forecaster: Box<dyn Forecaster>, horizon_hours: usize) -> Self {
        Self {
            fetcher,
            forecaster,
            horizon_hours,
        }
    }

    pub fn sites(&self) -> &[String] {
        self.fetcher.allowed()
    }

    pub fn horizon_hours(&self) -> usize {
        self.horizon_hours
    }

    /// Drop the cached series for `site`; the next run refetches it.
    pub fn invalidate(&self, site: &str) -> bool {
        self.fetcher.invalidate(site)
    }

    pub fn clear_cache(&self) -> usize {
        self.fetcher.clear_cache()
    }

    /// Fetch, window, train, forecast and partition. Any failure ends the run.
    pub async fn run(&self, site: &str, period: TrainingPeriod) -> Result<Dashboard, DashboardError> {
        let started = Instant::now();
        info!("🚀 Run started: site={} period={}", site, period.label());

        let result = self.run_stages(site, period, started).await;
        match &result {
            Ok(dashboard) => info!(
                "✅ Run finished in {:.1}s: {} past / {} future rows",
                dashboard.elapsed.as_secs_f64(),
                count_segment(&dashboard.rows, Segment::Past),
                count_segment(&dashboard.rows, Segment::Future)
            ),
            Err(e) => error!("Run for {} failed: {}", site, e),
        }
        result
    }

    async fn run_stages(
        &self,
        site: &str,
        period: TrainingPeriod,
        started: Instant,
    ) -> Result<Dashboard, DashboardError> {
        let series = self.fetcher.fetch(site).await?;

        let window = select_window(&series, period);
        let window_end = window.end().ok_or_else(|| {
            DashboardError::TrainingFailed("training window is empty".to_string())
        })?;
        info!(
            "Training window: {} points ending {}",
            window.len(),
            window_end.format("%Y-%m-%d %H:%M")
        );

        let (fitted, forecast) = train_and_forecast(self.forecaster.as_ref(), &window, self.horizon_hours)?;

        let rows = partition(forecast.iter().copied(), window_end);
        validate_forecast(&rows, window.len(), self.horizon_hours)?;

        Ok(Dashboard {
            site: site.to_string(),
            period,
            components: fitted.decompose(self.horizon_hours),
            summary: fitted.summary(),
            series,
            window,
            forecast,
            rows,
            elapsed: started.elapsed(),
        })
    }
}

/// Reject forecasts whose shape the dashboard cannot display.
pub fn validate_forecast(
    rows: &[ForecastRow],
    window_len: usize,
    horizon_hours: usize,
) -> Result<(), DashboardError> {
    let past = count_segment(rows, Segment::Past);
    let future = count_segment(rows, Segment::Future);

    if future != horizon_hours {
        return Err(DashboardError::RenderingError(format!(
            "expected {} future rows, model returned {}",
            horizon_hours, future
        )));
    }
    if past != window_len {
        return Err(DashboardError::RenderingError(format!(
            "expected {} fitted rows for the training window, model returned {}",
            window_len, past
        )));
    }
    if let Some(bad) = rows.iter().find(|r| !r.predicted_value.is_finite()) {
        return Err(DashboardError::RenderingError(format!(
            "non-numeric forecast at {}",
            bad.timestamp.format("%Y-%m-%d %H:%M")
        )));
    }
    Ok(())
}
