pub mod coordinator;
pub mod scheduler;
pub mod state;

pub use coordinator::{RefreshOutcome, Refresher};
pub use scheduler::{spawn_keep_alive, spawn_periodic};
pub use state::{LeaderboardState, Snapshot};
