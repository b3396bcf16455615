use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::data::cache::SeriesCache;
use crate::data::resample::{resample_hourly, GapFill};
use crate::data::throttle::RequestDelay;
use crate::data::trends::InterestProvider;
use crate::data::types::Series;
use crate::error::DashboardError;

/// Trailing timeframe requested from the provider.
pub const TIMEFRAME: &str = "now 7-d";

/// Hours kept after resampling the 7-day timeframe.
pub const SERIES_HOURS: usize = 7 * 24;

pub struct Fetcher {
    provider: Arc<dyn InterestProvider>,
    allowed: Vec<String>,
    cache: SeriesCache,
    delay: RequestDelay,
    timeout: Duration,
    gap_fill: GapFill,
}

impl Fetcher {
    pub fn new(
        provider: Arc<dyn InterestProvider>,
        allowed: Vec<String>,
        cache: SeriesCache,
        delay: RequestDelay,
        timeout: Duration,
        gap_fill: GapFill,
    ) -> Self {
        Self {
            provider,
            allowed,
            cache,
            delay,
            timeout,
            gap_fill,
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed(&self, keyword: &str) -> bool {
        self.allowed.iter().any(|k| k == keyword)
    }

    /// Forget the cached series so the next fetch hits the provider.
    pub fn invalidate(&self, keyword: &str) -> bool {
        self.cache.invalidate(keyword)
    }

    /// Forget every cached series; returns how many were dropped.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    /// Fetch the dense hourly series for an allow-listed keyword.
    pub async fn fetch(&self, keyword: &str) -> Result<Arc<Series>, DashboardError> {
        if !self.is_allowed(keyword) {
            warn!("Rejected keyword outside allow-list: {}", keyword);
            return Err(DashboardError::UnsupportedKeyword(keyword.to_string()));
        }

        if let Some(series) = self.cache.get(keyword) {
            info!("Cache hit for {} ({} points)", keyword, series.len());
            return Ok(series);
        }

        self.delay.wait().await;

        info!("Fetching interest over time for {}", keyword);
        let raw = tokio::time::timeout(
            self.timeout,
            self.provider.interest_over_time(keyword, TIMEFRAME),
        )
        .await
        .map_err(|_| {
            DashboardError::DataSourceUnavailable(format!(
                "no response within {:?}",
                self.timeout
            ))
        })?
        .map_err(|e| DashboardError::DataSourceUnavailable(format!("{:#}", e)))?;

        if raw.is_empty() {
            return Err(DashboardError::DataSourceUnavailable(format!(
                "no data returned for {}",
                keyword
            )));
        }

        let partial = raw.iter().filter(|o| o.is_partial).count();
        if partial > 0 {
            debug!("{} of {} observations for {} are partial", partial, raw.len(), keyword);
        }

        let series = Series::new(keyword, resample_hourly(&raw, SERIES_HOURS, self.gap_fill));
        if series.is_empty() {
            return Err(DashboardError::DataSourceUnavailable(format!(
                "no usable observations for {}",
                keyword
            )));
        }
        debug_assert!(series.is_hourly_dense());
        info!(
            "Resampled {} raw observations into {} hourly points",
            raw.len(),
            series.len()
        );

        let series = Arc::new(series);
        self.cache.insert(keyword.to_string(), Arc::clone(&series));
        debug!("Series cache holds {} keywords", self.cache.len());
        Ok(series)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::data::types::RawObservation;

    /// Provider returning a canned series and counting calls.
    pub(crate) struct StubProvider {
        pub observations: Vec<RawObservation>,
        pub calls: AtomicUsize,
        pub fail: bool,
        pub stall: bool,
    }

    impl StubProvider {
        pub fn with(observations: Vec<RawObservation>) -> Self {
            Self {
                observations,
                calls: AtomicUsize::new(0),
                fail: false,
                stall: false,
            }
        }
    }

    #[async_trait]
    impl InterestProvider for StubProvider {
        async fn interest_over_time(&self, _keyword: &str, _timeframe: &str) -> Result<Vec<RawObservation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.stall {
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            }
            if self.fail {
                anyhow::bail!("HTTP 429 Too Many Requests (rate limited)");
            }
            Ok(self.observations.clone())
        }
    }

    pub(crate) fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 11, 0, 0, 0).unwrap()
    }

    /// Eight-minute observations over seven days plus one hour, like the real feed.
    pub(crate) fn week_of_observations(value: f64) -> Vec<RawObservation> {
        (0..(169 * 60 / 8))
            .map(|i| RawObservation {
                timestamp: start() + ChronoDuration::minutes(i * 8),
                value,
                is_partial: false,
            })
            .collect()
    }

    pub(crate) fn fetcher_for(provider: Arc<StubProvider>, allowed: &[&str]) -> Fetcher {
        Fetcher::new(
            provider,
            allowed.iter().map(|s| s.to_string()).collect(),
            SeriesCache::default(),
            RequestDelay::disabled(),
            Duration::from_millis(200),
            GapFill::Zero,
        )
    }

    #[tokio::test]
    async fn test_fetch_produces_dense_week() {
        let provider = Arc::new(StubProvider::with(week_of_observations(42.0)));
        let fetcher = fetcher_for(provider, &["youtube.com"]);

        let series = fetcher.fetch("youtube.com").await.unwrap();

        assert_eq!(series.len(), 7 * 24);
        assert!(series.is_hourly_dense());
        assert!(series.points.iter().all(|p| (p.value - 42.0).abs() < 1e-9));
    }

    #[tokio::test]
    async fn test_fetch_fills_missing_hour_with_zero() {
        let missing = start() + ChronoDuration::hours(100);
        let observations: Vec<RawObservation> = week_of_observations(42.0)
            .into_iter()
            .filter(|o| o.timestamp < missing || o.timestamp >= missing + ChronoDuration::hours(1))
            .collect();
        let provider = Arc::new(StubProvider::with(observations));
        let fetcher = fetcher_for(provider, &["youtube.com"]);

        let series = fetcher.fetch("youtube.com").await.unwrap();

        let gap = series.points.iter().find(|p| p.timestamp == missing).unwrap();
        assert_eq!(gap.value, 0.0);
        assert_eq!(series.len(), 7 * 24);
    }

    #[tokio::test]
    async fn test_unsupported_keyword_never_reaches_provider() {
        let provider = Arc::new(StubProvider::with(week_of_observations(1.0)));
        let fetcher = fetcher_for(Arc::clone(&provider), &["youtube.com"]);

        let err = fetcher.fetch("example.org").await.unwrap_err();

        assert_eq!(err, DashboardError::UnsupportedKeyword("example.org".to_string()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let provider = Arc::new(StubProvider::with(week_of_observations(5.0)));
        let fetcher = fetcher_for(Arc::clone(&provider), &["amazon.com"]);

        fetcher.fetch("amazon.com").await.unwrap();
        fetcher.fetch("amazon.com").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        assert!(fetcher.invalidate("amazon.com"));
        fetcher.fetch("amazon.com").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_refetches_every_keyword() {
        let provider = Arc::new(StubProvider::with(week_of_observations(5.0)));
        let fetcher = fetcher_for(Arc::clone(&provider), &["amazon.com", "youtube.com"]);

        fetcher.fetch("amazon.com").await.unwrap();
        fetcher.fetch("youtube.com").await.unwrap();
        assert_eq!(fetcher.clear_cache(), 2);

        fetcher.fetch("amazon.com").await.unwrap();
        fetcher.fetch("youtube.com").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_provider_error_is_data_source_unavailable() {
        let mut stub = StubProvider::with(Vec::new());
        stub.fail = true;
        let fetcher = fetcher_for(Arc::new(stub), &["facebook.com"]);

        let err = fetcher.fetch("facebook.com").await.unwrap_err();

        assert!(matches!(err, DashboardError::DataSourceUnavailable(ref msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_empty_response_is_data_source_unavailable() {
        let fetcher = fetcher_for(Arc::new(StubProvider::with(Vec::new())), &["linkedin.com"]);

        let err = fetcher.fetch("linkedin.com").await.unwrap_err();

        assert!(matches!(err, DashboardError::DataSourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_data_source_unavailable() {
        let mut stub = StubProvider::with(week_of_observations(1.0));
        stub.stall = true;
        let fetcher = fetcher_for(Arc::new(stub), &["instagram.com"]);

        let err = fetcher.fetch("instagram.com").await.unwrap_err();

        assert!(matches!(err, DashboardError::DataSourceUnavailable(ref msg) if msg.contains("no response")));
    }
}
