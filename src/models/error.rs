use thiserror::Error;

/// Failure of a single data source. Every variant except `Cancelled`
/// advances the resolver to the next fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Source {source_name} unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("Failed to parse payload from {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("Fetch cancelled")]
    Cancelled,
}

impl SourceError {
    pub fn unavailable(source_name: &str, reason: impl ToString) -> Self {
        SourceError::Unavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(source_name: &str, reason: impl ToString) -> Self {
        SourceError::Parse {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SourceError::Cancelled)
    }
}

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("All {} data sources failed", attempts.len())]
    AllSourcesExhausted { attempts: Vec<SourceError> },

    #[error("Refresh superseded by a newer request")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LeaderboardError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LeaderboardError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
