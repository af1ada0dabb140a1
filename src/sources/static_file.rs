use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::config::ColumnMapping;
use crate::models::{RawRecord, Result, SourceError};
use crate::sources::{
    client::{DataSource, SourceClientConfig},
    payload,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(String),
    Local(PathBuf),
}

impl Location {
    /// `http://` and `https://` entries are fetched over the network,
    /// anything else is read from disk.
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        let lower = entry.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Location::Remote(entry.to_string())
        } else {
            Location::Local(PathBuf::from(entry))
        }
    }

    pub fn display(&self) -> String {
        match self {
            Location::Remote(url) => url.clone(),
            Location::Local(path) => path.display().to_string(),
        }
    }
}

/// Fallback source: a CSV export published as a static resource.
pub struct StaticSource {
    location: Location,
    mapping: ColumnMapping,
    http_client: Option<reqwest::Client>,
}

impl StaticSource {
    pub fn new(entry: &str, mapping: ColumnMapping, config: &SourceClientConfig) -> Result<Self> {
        let location = Location::parse(entry);
        let http_client = match location {
            Location::Remote(_) => Some(config.build_client()?),
            Location::Local(_) => None,
        };

        Ok(Self {
            location,
            mapping,
            http_client,
        })
    }

    async fn read_text(&self) -> std::result::Result<String, SourceError> {
        let name = self.location.display();
        match (&self.location, &self.http_client) {
            (Location::Remote(url), Some(client)) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| SourceError::unavailable(&name, e))?;

                if !response.status().is_success() {
                    return Err(SourceError::unavailable(
                        &name,
                        format!("HTTP status {}", response.status()),
                    ));
                }

                response
                    .text()
                    .await
                    .map_err(|e| SourceError::unavailable(&name, e))
            }
            (Location::Local(path), _) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SourceError::unavailable(&name, e)),
            (Location::Remote(_), None) => Err(SourceError::unavailable(&name, "no HTTP client")),
        }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> String {
        self.location.display()
    }

    async fn fetch(&self) -> std::result::Result<Vec<RawRecord>, SourceError> {
        let text = self.read_text().await?;
        debug!("Read {} bytes from {}", text.len(), self.location.display());
        payload::parse_csv(&self.location.display(), &text, &self.mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!(
            Location::parse("https://example.org/data.csv"),
            Location::Remote("https://example.org/data.csv".to_string())
        );
        assert_eq!(
            Location::parse("public/data.csv"),
            Location::Local(PathBuf::from("public/data.csv"))
        );
    }

    #[tokio::test]
    async fn test_missing_local_file_is_unavailable() {
        let source = StaticSource::new(
            "definitely/not/here.csv",
            ColumnMapping::default(),
            &SourceClientConfig::default(),
        )
        .unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_reads_local_csv() {
        let path = std::env::temp_dir().join(format!("leaderboard-static-{}.csv", std::process::id()));
        tokio::fs::write(&path, "Name,# of Arcade Games Completed\nAda,4\n")
            .await
            .unwrap();

        let source = StaticSource::new(
            path.to_str().unwrap(),
            ColumnMapping::default(),
            &SourceClientConfig::default(),
        )
        .unwrap();
        let records = source.fetch().await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ada");
        assert_eq!(records[0].arcade_games, 4);
    }
}
