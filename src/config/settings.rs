use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::Path;
use std::time::Duration;

use super::ColumnMapping;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub sources: SourceSettings,
    pub retry: RetrySettings,
    pub refresh: RefreshSettings,
    pub columns: ColumnMapping,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Base URL of the leaderboard API; the primary source.
    pub api_base_url: String,
    pub leaderboard_path: String,
    pub health_path: String,
    /// Static CSV resources tried in order when the API fails. Entries are
    /// `http(s)://` URLs or local file paths.
    pub fallbacks: Vec<String>,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Data files the backend serves, in priority order.
    pub data_files: Vec<String>,
    /// Public URL of this service. When set, `/api/health` is pinged on
    /// `keep_alive_interval_seconds` to keep hosted instances awake.
    pub keep_alive_url: Option<String>,
    pub keep_alive_interval_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Arcade Leaderboard".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
            },
            sources: SourceSettings {
                api_base_url: "http://localhost:5000".to_string(),
                leaderboard_path: "/api/leaderboard".to_string(),
                health_path: "/api/health".to_string(),
                fallbacks: vec![
                    "public/data.csv".to_string(),
                    "data/profiles/profiles_data.csv".to_string(),
                    "profiles_data.csv".to_string(),
                ],
                timeout_seconds: 15,
                user_agent: format!("arcade-leaderboard/{}", env!("CARGO_PKG_VERSION")),
            },
            retry: RetrySettings {
                max_attempts: 1,
                base_delay_ms: 250,
                max_delay_ms: 5_000,
                backoff_multiplier: 2.0,
            },
            refresh: RefreshSettings {
                interval_seconds: 300, // 5 minutes
            },
            columns: ColumnMapping::default(),
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 5000,
                data_files: vec![
                    "data/profiles/profiles_data.csv".to_string(),
                    "profiles_data.csv".to_string(),
                ],
                keep_alive_url: None,
                keep_alive_interval_seconds: 600, // 10 minutes
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::environment())
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        s.try_deserialize()
    }

    fn environment() -> config::Environment {
        let environment = config::Environment::with_prefix("LEADERBOARD")
            .separator("__")
            .try_parsing(true)
            .list_separator(",");

        LIST_KEYS
            .iter()
            .fold(environment, |env, key| env.with_list_parse_key(key))
    }

    pub fn leaderboard_url(&self) -> String {
        join_url(&self.sources.api_base_url, &self.sources.leaderboard_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.sources.api_base_url, &self.sources.health_path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_seconds)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.refresh.interval_seconds == 0 {
            return Err("Refresh interval must be greater than zero".to_string());
        }

        if self.sources.timeout_seconds == 0 {
            return Err("Source timeout must be greater than zero".to_string());
        }

        if self.retry.max_attempts == 0 {
            return Err("Retry max_attempts must be at least 1".to_string());
        }

        if self.retry.backoff_multiplier < 1.0 {
            return Err("Retry backoff multiplier must be at least 1.0".to_string());
        }

        if self.server.keep_alive_url.is_some() && self.server.keep_alive_interval_seconds == 0 {
            return Err("Keep-alive interval must be greater than zero".to_string());
        }

        self.columns.validate()
    }
}

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: [&str; 11] = [
    "sources.fallbacks",
    "server.data_files",
    "columns.name",
    "columns.arcade_games",
    "columns.special_arcade_games",
    "columns.trivia_games",
    "columns.skill_badges",
    "columns.lab_free_courses",
    "columns.profile_url",
    "columns.score",
    "columns.milestone",
];

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
