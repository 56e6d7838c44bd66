use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub datasets: DatasetUrls,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Where each CSV asset is served from. Defaults point at the dashboard's
/// static asset paths on a local dev server.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetUrls {
    #[serde(default = "default_food_prices_url")]
    pub food_prices: String,
    #[serde(default = "default_ghi_scores_url")]
    pub ghi_scores: String,
    #[serde(default = "default_ghi_trends_url")]
    pub ghi_trends: String,
    #[serde(default = "default_ghi_indicators_url")]
    pub ghi_indicators: String,
    #[serde(default = "default_poverty_url")]
    pub poverty: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout. A hung request must not leave a command waiting
    /// forever.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Total attempts per dataset (first try plus retries).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base delay between attempts; doubles after each failure.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_food_prices_url() -> String {
    "http://localhost:3000/data/combined_country_food_prices.csv".to_string()
}

fn default_ghi_scores_url() -> String {
    "http://localhost:3000/ghi_scores_cleaned.csv".to_string()
}

fn default_ghi_trends_url() -> String {
    "http://localhost:3000/data/ghi_scores_lat_long.csv".to_string()
}

fn default_ghi_indicators_url() -> String {
    "http://localhost:3000/ghi_indicators_cleaned.csv".to_string()
}

fn default_poverty_url() -> String {
    "http://localhost:3000/data/clean_poverty_data.csv".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for DatasetUrls {
    fn default() -> Self {
        Self {
            food_prices: default_food_prices_url(),
            ghi_scores: default_ghi_scores_url(),
            ghi_trends: default_ghi_trends_url(),
            ghi_indicators: default_ghi_indicators_url(),
            poverty: default_poverty_url(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: DatasetUrls::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
