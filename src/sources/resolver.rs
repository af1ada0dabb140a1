use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::models::{LeaderboardError, RawRecord, Result, SourceError};
use crate::sources::{
    api::ApiSource,
    client::{DataSource, SourceClientConfig},
    resilience::RetryConfig,
    static_file::StaticSource,
};

/// Records together with the source that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub source: String,
    pub records: Vec<RawRecord>,
}

/// Runs `attempts` in order and returns the first success. Every failure
/// is collected; a cancellation stops the chain at once and is the last
/// collected error.
pub async fn first_success<T, I, F, Fut>(attempts: I) -> std::result::Result<T, Vec<SourceError>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, SourceError>>,
{
    let mut errors = Vec::new();
    for attempt in attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let cancelled = e.is_cancelled();
                errors.push(e);
                if cancelled {
                    break;
                }
            }
        }
    }
    Err(errors)
}

/// Ordered chain of data sources: the primary first, then each fallback.
pub struct DataSourceResolver {
    sources: Vec<Arc<dyn DataSource>>,
}

impl DataSourceResolver {
    pub fn new(sources: Vec<Arc<dyn DataSource>>) -> Self {
        Self { sources }
    }

    /// Builds the API source followed by the configured fallbacks.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client_config = SourceClientConfig::from_settings(settings);
        let retry = RetryConfig::from(&settings.retry);

        let mut sources: Vec<Arc<dyn DataSource>> = vec![Arc::new(ApiSource::new(
            settings.leaderboard_url(),
            &client_config,
            retry,
        )?)];
        for entry in &settings.sources.fallbacks {
            sources.push(Arc::new(StaticSource::new(
                entry,
                settings.columns.clone(),
                &client_config,
            )?));
        }

        Ok(Self::new(sources))
    }

    /// Builds a chain of static files only, as used by the backend.
    pub fn from_files(entries: &[String], settings: &Settings) -> Result<Self> {
        let client_config = SourceClientConfig::from_settings(settings);
        let sources = entries
            .iter()
            .map(|entry| {
                StaticSource::new(entry, settings.columns.clone(), &client_config)
                    .map(|s| Arc::new(s) as Arc<dyn DataSource>)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(sources))
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Loads records from the first source that succeeds. Each fetch is
    /// raced against `cancel`; once cancelled no further source is tried.
    pub async fn resolve(&self, cancel: &CancellationToken) -> Result<Resolved> {
        let attempts = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            move || async move {
                let name = source.name();
                if cancel.is_cancelled() {
                    return Err(SourceError::Cancelled);
                }

                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(SourceError::Cancelled),
                    result = source.fetch() => result,
                };

                match &result {
                    Ok(records) => info!("Loaded {} records from {}", records.len(), name),
                    Err(SourceError::Cancelled) => debug!("Fetch from {} cancelled", name),
                    Err(e) => warn!("{}", e),
                }

                result.map(|records| Resolved { source: name, records })
            }
        })
        .collect::<Vec<_>>();

        match first_success(attempts).await {
            Ok(resolved) => Ok(resolved),
            Err(errors) if errors.last().map_or(false, SourceError::is_cancelled) => {
                Err(LeaderboardError::Cancelled)
            }
            Err(errors) => Err(LeaderboardError::AllSourcesExhausted { attempts: errors }),
        }
    }
}
