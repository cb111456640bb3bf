//! `StatsReporter` trait and the HTTP implementation.

use async_trait::async_trait;
use thiserror::Error;

use super::StatRecord;
use crate::config::StatsConfig;

// ---------------------------------------------------------------------------
// ReportError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// Transport or connection error.
    #[error("stats request failed: {0}")]
    Request(String),

    /// The service did not answer within the configured timeout.
    #[error("stats request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("stats service returned HTTP {0}")]
    Status(u16),
}

impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ReportError::Timeout
        } else {
            ReportError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// StatsReporter trait
// ---------------------------------------------------------------------------

/// Sink for terminal results.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn StatsReporter>` with spawned report tasks.
#[async_trait]
pub trait StatsReporter: Send + Sync {
    async fn report(&self, record: &StatRecord) -> Result<(), ReportError>;
}

// ---------------------------------------------------------------------------
// HttpStatsReporter
// ---------------------------------------------------------------------------

/// POSTs each record as JSON to `{base_url}/add_stat`.
pub struct HttpStatsReporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStatsReporter {
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &StatsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client, &config.base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/add_stat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatsReporter for HttpStatsReporter {
    async fn report(&self, record: &StatRecord) -> Result<(), ReportError> {
        let response = self.client.post(&self.endpoint).json(record).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status.as_u16()));
        }
        log::debug!("stats: sent {record}");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DisabledReporter
// ---------------------------------------------------------------------------

/// Logs records instead of sending them (`stats.enabled = false`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledReporter;

#[async_trait]
impl StatsReporter for DisabledReporter {
    async fn report(&self, record: &StatRecord) -> Result<(), ReportError> {
        log::info!("stats disabled, not sending: {record}");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
