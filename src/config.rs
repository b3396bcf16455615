use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use crate::data::resample::GapFill;
use crate::data::throttle::RequestDelay;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sites: SitesConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "default_sites")]
    pub allowed: Vec<String>,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self { allowed: default_sites() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_delay_min")]
    pub delay_min_secs: f64,
    #[serde(default = "default_delay_max")]
    pub delay_max_secs: f64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub gap_fill: GapFill,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: default_delay_min(),
            delay_max_secs: default_delay_max(),
            timeout_secs: default_timeout(),
            gap_fill: GapFill::default(),
        }
    }
}

impl FetchConfig {
    pub fn delay(&self) -> RequestDelay {
        RequestDelay::from_secs_f64(self.delay_min_secs, self.delay_max_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CacheConfig {
    /// Absent means entries live for the whole session.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_horizon")]
    pub horizon_hours: usize,
    #[serde(default = "default_min_points")]
    pub min_points: usize,
    /// Season length for the decomposition; shorter windows than two
    /// seasons are fitted without it.
    #[serde(default = "default_seasonal_period")]
    pub seasonal_period_hours: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            horizon_hours: default_horizon(),
            min_points: default_min_points(),
            seasonal_period_hours: default_seasonal_period(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
    #[serde(default = "default_combined_rows")]
    pub combined_rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sample_rows: default_sample_rows(),
            combined_rows: default_combined_rows(),
        }
    }
}

fn default_sites() -> Vec<String> {
    ["youtube.com", "instagram.com", "facebook.com", "amazon.com", "linkedin.com", "bitmesra.ac.in"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_delay_min() -> f64 { 0.5 }
fn default_delay_max() -> f64 { 2.0 }
fn default_timeout() -> u64 { 30 }
fn default_horizon() -> usize { 48 }
fn default_min_points() -> usize { 12 }
fn default_seasonal_period() -> usize { 24 }
fn default_sample_rows() -> usize { 5 }
fn default_combined_rows() -> usize { 60 }

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub config_path: String,
    pub trends_base_url: String,
    pub trends_hl: String,
    pub trends_tz: i32,
    pub trends_geo: String,
    pub log_file: String,
}

impl Config {
    /// Load from a TOML file; a missing file means all defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sites.allowed.is_empty() {
            bail!("[sites] allowed must list at least one site");
        }
        if self.fetch.delay_min_secs < 0.0 || self.fetch.delay_min_secs > self.fetch.delay_max_secs {
            bail!(
                "[fetch] delay range invalid: {} > {}",
                self.fetch.delay_min_secs,
                self.fetch.delay_max_secs
            );
        }
        if self.fetch.timeout_secs == 0 {
            bail!("[fetch] timeout_secs must be positive");
        }
        if self.model.horizon_hours == 0 {
            bail!("[model] horizon_hours must be positive");
        }
        if self.model.min_points < 2 {
            bail!("[model] min_points must be at least 2");
        }
        if self.model.seasonal_period_hours < 2 {
            bail!("[model] seasonal_period_hours must be at least 2");
        }
        Ok(())
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            config_path: std::env::var("CONFIG_PATH")
                .unwrap_or_else(|_| "config.toml".to_string()),
            trends_base_url: std::env::var("TRENDS_BASE_URL")
                .unwrap_or_else(|_| "https://trends.google.com".to_string()),
            trends_hl: std::env::var("TRENDS_HL")
                .unwrap_or_else(|_| "en-US".to_string()),
            trends_tz: std::env::var("TRENDS_TZ")
                .unwrap_or_else(|_| "360".to_string())
                .parse()
                .context("TRENDS_TZ must be an integer offset in minutes")?,
            trends_geo: std::env::var("TRENDS_GEO").unwrap_or_default(),
            log_file: std::env::var("LOG_FILE")
                .unwrap_or_else(|_| "trends-forecast.log".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.sites.allowed.len(), 6);
        assert_eq!(config.model.horizon_hours, 48);
        assert_eq!(config.model.seasonal_period_hours, 24);
        assert_eq!(config.fetch.gap_fill, GapFill::Zero);
        assert_eq!(config.cache.ttl(), None);
        assert_eq!(config.ui.combined_rows, 60);
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse(
            r#"
            [sites]
            allowed = ["example.com"]

            [fetch]
            delay_min_secs = 0.0
            delay_max_secs = 0.0
            gap_fill = "linear"

            [cache]
            ttl_secs = 600

            [model]
            horizon_hours = 24
            min_points = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.sites.allowed, vec!["example.com".to_string()]);
        assert!(config.fetch.delay().is_disabled());
        assert_eq!(config.fetch.gap_fill, GapFill::Linear);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(600)));
        assert_eq!(config.model.horizon_hours, 24);
        assert_eq!(config.model.min_points, 30);
        assert_eq!(config.model.seasonal_period_hours, 24);
    }

    #[test]
    fn test_rejects_empty_allow_list() {
        assert!(Config::parse("[sites]\nallowed = []").is_err());
    }

    #[test]
    fn test_rejects_inverted_delay() {
        assert!(Config::parse("[fetch]\ndelay_min_secs = 3.0\ndelay_max_secs = 1.0").is_err());
    }

    #[test]
    fn test_rejects_degenerate_model_settings() {
        assert!(Config::parse("[model]\nhorizon_hours = 0").is_err());
        assert!(Config::parse("[model]\nseasonal_period_hours = 1").is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = Config::parse(include_str!("../config.toml")).unwrap();

        assert_eq!(config.sites.allowed, default_sites());
        assert_eq!(config.model.min_points, 12);
        assert_eq!(config.cache.ttl(), None);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load("/nonexistent/trends-forecast.toml").unwrap();
        assert_eq!(config.sites.allowed, default_sites());
    }
}
