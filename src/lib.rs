pub mod config;
pub mod models;
pub mod refresh;
pub mod scoring;
pub mod server;
pub mod sources;
pub mod tui;

pub use config::Settings;
pub use models::{LeaderboardError, Milestone, RankedParticipant, RawRecord, Result, ScoredParticipant};
pub use refresh::{LeaderboardState, Refresher};
pub use sources::DataSourceResolver;
