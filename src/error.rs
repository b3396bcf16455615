/// Terminal failure of a single dashboard run.
///
/// Every stage of the pipeline converts its failures into one of these so
/// the dashboard can show a message and a remedy instead of crashing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("Unsupported site: {0}")]
    UnsupportedKeyword(String),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Training failed: {0}")]
    TrainingFailed(String),

    #[error("Cannot render forecast: {0}")]
    RenderingError(String),
}

impl DashboardError {
    pub fn title(&self) -> &'static str {
        match self {
            DashboardError::UnsupportedKeyword(_) => "Unsupported site",
            DashboardError::DataSourceUnavailable(_) => "Data source unavailable",
            DashboardError::TrainingFailed(_) => "Training failed",
            DashboardError::RenderingError(_) => "Rendering error",
        }
    }

    /// Probable cause and what the user can do about it.
    pub fn remedy(&self) -> &'static str {
        match self {
            DashboardError::UnsupportedKeyword(_) => {
                "Pick one of the configured sites, or add it to [sites] in config.toml."
            }
            DashboardError::DataSourceUnavailable(_) => {
                "The public Trends API is unauthenticated and throttles bursts. \
                 It may be rate-limiting you: wait a minute and retry, or try a different site."
            }
            DashboardError::TrainingFailed(_) => {
                "The training window is too short or has no variation. \
                 Try a longer training period or a different site."
            }
            DashboardError::RenderingError(_) => {
                "The model returned an unexpected forecast shape. \
                 Try a different training period and re-run."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = DashboardError::DataSourceUnavailable("HTTP 429".to_string());
        assert_eq!(err.to_string(), "Data source unavailable: HTTP 429");
        assert!(err.remedy().contains("rate-limiting"));
    }

    #[test]
    fn test_training_remedy_suggests_period() {
        let err = DashboardError::TrainingFailed("constant window".to_string());
        assert_eq!(err.title(), "Training failed");
        assert!(err.remedy().contains("training period"));
    }
}
