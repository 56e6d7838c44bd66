use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::config::FetchConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::parser::{parse_csv, RawRecord};

/// A named origin of CSV text. Implementations cover HTTP-served assets and
/// in-memory fixtures for tests.
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Dataset identifier used in logs and snapshot labels.
    fn name(&self) -> &str;

    /// Fetch the raw CSV text for this dataset.
    async fn fetch_text(&self) -> Result<String>;
}

/// Fetches a CSV asset over HTTP with a per-request timeout.
pub struct HttpSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(name: &str, url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl DatasetSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(dataset = %self.name))]
    async fn fetch_text(&self) -> Result<String> {
        debug!("Fetching {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}

/// In-memory source for tests and offline runs.
pub struct StaticSource {
    name: String,
    body: String,
}

impl StaticSource {
    pub fn new(name: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            body: body.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DatasetSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_text(&self) -> Result<String> {
        Ok(self.body.clone())
    }
}

/// An immutable fetch result. Each call to the fetcher produces a fresh
/// snapshot; nothing is cached in module state.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub name: String,
    pub fetched_at: DateTime<Utc>,
    pub records: Vec<RawRecord>,
}

impl DatasetSnapshot {
    /// The "no data" state a page falls back to when a fetch fails.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fetched_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetches dataset snapshots with bounded retry and exponential backoff.
pub struct DatasetFetcher {
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl DatasetFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            retry_attempts: config.retry_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Fetches and parses one dataset, retrying transient failures.
    #[instrument(skip(self, source), fields(dataset = %source.name()))]
    pub async fn fetch_snapshot(&self, source: &dyn DatasetSource) -> Result<DatasetSnapshot> {
        let mut backoff = self.retry_backoff;
        let mut last_error: Option<PipelineError> = None;

        for attempt in 1..=self.retry_attempts {
            match source.fetch_text().await {
                Ok(text) => {
                    let records = parse_csv(&text)?;
                    info!(
                        "Fetched dataset '{}': {} records (attempt {})",
                        source.name(),
                        records.len(),
                        attempt
                    );
                    return Ok(DatasetSnapshot {
                        name: source.name().to_string(),
                        fetched_at: Utc::now(),
                        records,
                    });
                }
                Err(e) => {
                    warn!(
                        "Fetch attempt {}/{} for '{}' failed: {}",
                        attempt,
                        self.retry_attempts,
                        source.name(),
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.retry_attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PipelineError::Dataset {
            message: format!("fetch of '{}' failed with no attempts made", source.name()),
        }))
    }

    /// Like [`fetch_snapshot`](Self::fetch_snapshot), but degrades to an
    /// empty snapshot instead of failing the whole command.
    pub async fn fetch_snapshot_or_empty(&self, source: &dyn DatasetSource) -> DatasetSnapshot {
        match self.fetch_snapshot(source).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(
                    "Giving up on dataset '{}' after {} attempts: {}; continuing with no data",
                    source.name(),
                    self.retry_attempts,
                    e
                );
                DatasetSnapshot::empty(source.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails a configurable number of times before succeeding.
    struct FlakySource {
        failures_remaining: AtomicU32,
        body: String,
    }

    #[async_trait::async_trait]
    impl DatasetSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch_text(&self) -> Result<String> {
            if self
                .failures_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(PipelineError::Dataset {
                    message: "simulated outage".to_string(),
                });
            }
            Ok(self.body.clone())
        }
    }

    fn quick_fetcher(attempts: u32) -> DatasetFetcher {
        DatasetFetcher::new(&FetchConfig {
            timeout_seconds: 1,
            retry_attempts: attempts,
            retry_backoff_ms: 1,
        })
    }

    #[tokio::test]
    async fn test_static_source_snapshot() {
        let source = StaticSource::new("test", "a,b\n1,2\n");
        let snapshot = quick_fetcher(1).fetch_snapshot(&source).await.unwrap();
        assert_eq!(snapshot.name, "test");
        assert_eq!(snapshot.records.len(), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let source = FlakySource {
            failures_remaining: AtomicU32::new(2),
            body: "a,b\n1,2\n".to_string(),
        };
        let snapshot = quick_fetcher(3).fetch_snapshot(&source).await.unwrap();
        assert_eq!(snapshot.records.len(), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let source = FlakySource {
            failures_remaining: AtomicU32::new(10),
            body: String::new(),
        };
        assert!(quick_fetcher(3).fetch_snapshot(&source).await.is_err());
        // 3 attempts consumed
        assert_eq!(source.failures_remaining.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_fallback_to_empty_snapshot() {
        let source = FlakySource {
            failures_remaining: AtomicU32::new(10),
            body: String::new(),
        };
        let snapshot = quick_fetcher(2).fetch_snapshot_or_empty(&source).await;
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.name, "flaky");
    }
}
