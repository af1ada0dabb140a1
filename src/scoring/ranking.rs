use crate::models::{RankedParticipant, ScoredParticipant};

/// Sorts by score, highest first, and numbers the result from 1.
///
/// The sort is stable: participants with equal scores keep the order in
/// which the source delivered them.
pub fn rank(mut participants: Vec<ScoredParticipant>) -> Vec<RankedParticipant> {
    participants.sort_by(|a, b| b.score.cmp(&a.score));

    participants
        .into_iter()
        .enumerate()
        .map(|(i, participant)| RankedParticipant {
            rank: i + 1,
            participant,
        })
        .collect()
}
