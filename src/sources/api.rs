use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::models::{RawRecord, Result, SourceError};
use crate::sources::{
    client::{DataSource, SourceClientConfig},
    payload,
    resilience::{retry_with_backoff, RetryConfig},
};

/// Primary source: the leaderboard API returning a JSON array.
pub struct ApiSource {
    http_client: reqwest::Client,
    url: String,
    retry: RetryConfig,
}

impl ApiSource {
    pub fn new(url: String, config: &SourceClientConfig, retry: RetryConfig) -> Result<Self> {
        Ok(Self {
            http_client: config.build_client()?,
            url,
            retry,
        })
    }

    async fn fetch_once(&self) -> std::result::Result<Vec<RawRecord>, SourceError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::unavailable(
                &self.url,
                format!("HTTP status {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::unavailable(&self.url, e))?;

        debug!("Received {} bytes from {}", body.len(), self.url);
        payload::parse_json(&self.url, &body)
    }
}

#[async_trait]
impl DataSource for ApiSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> std::result::Result<Vec<RawRecord>, SourceError> {
        retry_with_backoff(&self.retry, &self.url, || self.fetch_once()).await
    }
}

/// Liveness check against a service's health endpoint.
pub struct HealthCheck {
    http_client: reqwest::Client,
    url: String,
}

impl HealthCheck {
    pub fn new(url: String, config: &SourceClientConfig) -> Result<Self> {
        Ok(Self {
            http_client: config.build_client()?,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true when the endpoint answers 200 OK. Failures are logged,
    /// never propagated.
    pub async fn check(&self) -> bool {
        match self.http_client.get(&self.url).send().await {
            Ok(response) => {
                info!("Health check {}: status {}", self.url, response.status());
                response.status() == reqwest::StatusCode::OK
            }
            Err(e) => {
                error!("Health check {} failed: {}", self.url, e);
                false
            }
        }
    }
}
