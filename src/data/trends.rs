use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use crate::data::types::RawObservation;

/// Source of relative search interest for a keyword.
#[async_trait]
pub trait InterestProvider: Send + Sync {
    async fn interest_over_time(&self, keyword: &str, timeframe: &str) -> Result<Vec<RawObservation>>;
}

/// Client for the public (unauthenticated) Google Trends endpoints.
pub struct TrendsClient {
    client: Client,
    base_url: String,
    hl: String,
    tz: i32,
    geo: String,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Deserialize)]
struct ExploreWidget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: MultilineData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultilineData {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<f64>,
    #[serde(default)]
    is_partial: bool,
}

/// Timeseries widget handle returned by the explore call.
#[derive(Debug, Clone, PartialEq)]
struct TimeseriesWidget {
    token: String,
    request: serde_json::Value,
}

impl TrendsClient {
    pub fn new(base_url: String, hl: String, tz: i32, geo: String) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) trends-forecast/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            hl,
            tz,
            geo,
        })
    }

    /// The API refuses requests without the NID cookie set by the landing page.
    async fn warm_cookies(&self) -> Result<()> {
        let url = format!("{}/", self.base_url);
        let response = self.client
            .get(&url)
            .query(&[("geo", self.geo.as_str())])
            .send()
            .await
            .context("Failed to reach Trends landing page")?;
        check_status(&response, "landing page")?;
        Ok(())
    }

    async fn explore(&self, keyword: &str, timeframe: &str) -> Result<TimeseriesWidget> {
        let url = format!("{}/trends/api/explore", self.base_url);
        let req = json!({
            "comparisonItem": [{ "keyword": keyword, "time": timeframe, "geo": self.geo }],
            "category": 0,
            "property": "",
        })
        .to_string();
        let tz = self.tz.to_string();

        let response = self.client
            .post(&url)
            .query(&[("hl", self.hl.as_str()), ("tz", tz.as_str()), ("req", req.as_str())])
            .send()
            .await
            .context("Failed to call explore endpoint")?;
        check_status(&response, "explore")?;

        let body = response.text().await.context("Failed to read explore response")?;
        parse_explore(&body)
    }

    async fn multiline(&self, widget: &TimeseriesWidget) -> Result<Vec<RawObservation>> {
        let url = format!("{}/trends/api/widgetdata/multiline", self.base_url);
        let req = widget.request.to_string();
        let tz = self.tz.to_string();

        let response = self.client
            .get(&url)
            .query(&[
                ("hl", self.hl.as_str()),
                ("tz", tz.as_str()),
                ("req", req.as_str()),
                ("token", widget.token.as_str()),
            ])
            .send()
            .await
            .context("Failed to call multiline endpoint")?;
        check_status(&response, "multiline")?;

        let body = response.text().await.context("Failed to read multiline response")?;
        parse_timeline(&body)
    }
}

#[async_trait]
impl InterestProvider for TrendsClient {
    async fn interest_over_time(&self, keyword: &str, timeframe: &str) -> Result<Vec<RawObservation>> {
        self.warm_cookies().await?;
        let widget = self.explore(keyword, timeframe).await?;
        debug!("Got TIMESERIES widget token for {}", keyword);

        let observations = self.multiline(&widget).await?;
        info!("📡 {} observations for {} ({})", observations.len(), keyword, timeframe);
        Ok(observations)
    }
}

fn check_status(response: &Response, endpoint: &str) -> Result<()> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        bail!("{} returned HTTP 429 Too Many Requests (rate limited)", endpoint);
    }
    if !status.is_success() {
        bail!("{} returned HTTP {}", endpoint, status);
    }
    Ok(())
}

/// Google prefixes JSON bodies with an anti-XSSI guard such as `)]}'`.
fn strip_xssi(body: &str) -> Result<&str> {
    let start = body.find('{').context("Response contains no JSON object")?;
    Ok(&body[start..])
}

fn parse_explore(body: &str) -> Result<TimeseriesWidget> {
    let response: ExploreResponse = serde_json::from_str(strip_xssi(body)?)
        .context("Failed to parse explore response")?;

    let widget = response
        .widgets
        .into_iter()
        .find(|w| w.id == "TIMESERIES")
        .context("Explore response has no TIMESERIES widget")?;

    Ok(TimeseriesWidget {
        token: widget.token.context("TIMESERIES widget has no token")?,
        request: widget.request.context("TIMESERIES widget has no request")?,
    })
}

fn parse_timeline(body: &str) -> Result<Vec<RawObservation>> {
    let response: MultilineResponse = serde_json::from_str(strip_xssi(body)?)
        .context("Failed to parse multiline response")?;

    response
        .default
        .timeline_data
        .into_iter()
        .map(|point| {
            let secs: i64 = point
                .time
                .parse()
                .with_context(|| format!("Invalid timeline time: {}", point.time))?;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .with_context(|| format!("Timeline time out of range: {}", secs))?;
            let value = point
                .value
                .first()
                .copied()
                .context("Timeline point has no value")?;

            Ok(RawObservation {
                timestamp,
                value,
                is_partial: point.is_partial,
            })
        })
        .collect()
}
