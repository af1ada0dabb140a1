pub mod algorithm;
pub mod badges;
pub mod calculator;
pub mod ranking;
pub mod tiers;

pub use algorithm::{score, ScoreResult};
pub use calculator::{build_leaderboard, score_record};
pub use ranking::rank;
pub use tiers::{next_tier, MilestoneTier, Shortfall, TIERS};
