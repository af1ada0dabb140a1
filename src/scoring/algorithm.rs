use serde::{Deserialize, Serialize};

use crate::models::{Milestone, RawRecord};
use super::tiers::TIERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub milestone: Milestone,
}

/// Points earned before any milestone bonus: one per arcade game, one per
/// trivia game and one per two skill badges.
pub fn base_points(record: &RawRecord) -> u32 {
    record
        .arcade_games
        .saturating_add(record.trivia_games)
        .saturating_add(record.skill_badges / 2)
}

/// Highest milestone whose thresholds the record meets.
pub fn milestone_for(record: &RawRecord) -> Milestone {
    TIERS
        .iter()
        .find(|tier| tier.is_met_by(record))
        .map(|tier| tier.milestone)
        .unwrap_or(Milestone::None)
}

/// Computes score and milestone from badge counts. Special arcade games
/// are carried on the record but do not contribute.
pub fn score(record: &RawRecord) -> ScoreResult {
    let base = base_points(record);

    match TIERS.iter().find(|tier| tier.is_met_by(record)) {
        Some(tier) => ScoreResult {
            score: base.saturating_add(tier.bonus),
            milestone: tier.milestone,
        },
        None => ScoreResult {
            score: base,
            milestone: Milestone::None,
        },
    }
}
