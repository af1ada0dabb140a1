use async_trait::async_trait;
use std::time::Duration;

use crate::config::Settings;
use crate::models::{LeaderboardError, RawRecord, Result, SourceError};

/// A place leaderboard records can be loaded from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable identifier used in logs and error reports
    fn name(&self) -> String;

    /// Fetch and parse all records. Any error moves the resolver on to the
    /// next source.
    async fn fetch(&self) -> std::result::Result<Vec<RawRecord>, SourceError>;
}

/// Configuration for HTTP-backed sources
#[derive(Debug, Clone)]
pub struct SourceClientConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl SourceClientConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            timeout_seconds: settings.sources.timeout_seconds,
            user_agent: settings.sources.user_agent.clone(),
        }
    }

    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| LeaderboardError::ConfigError(format!("Failed to create HTTP client: {}", e)))
    }
}

impl Default for SourceClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            user_agent: format!("arcade-leaderboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
