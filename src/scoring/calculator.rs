use crate::models::{RankedParticipant, RawRecord, ScoredParticipant};
use crate::scoring::{algorithm, ranking};
use tracing::{debug, info};

/// Scores a single record. Authoritative records keep the score and
/// milestone their source supplied; the result is `None` when that score
/// is not a number.
pub fn score_record(record: RawRecord) -> Option<ScoredParticipant> {
    match record.provided.clone() {
        Some(provided) => match provided.score {
            Some(score) => Some(ScoredParticipant::from_record(record, score, provided.milestone)),
            None => {
                debug!("Excluding {} from ranking: score is not a number", record.name);
                None
            }
        },
        None => {
            let result = algorithm::score(&record);
            Some(ScoredParticipant::from_record(record, result.score, result.milestone))
        }
    }
}

/// Turns one batch of source records into the ranked leaderboard.
pub fn build_leaderboard(records: Vec<RawRecord>) -> Vec<RankedParticipant> {
    let total = records.len();
    let authoritative = records.iter().filter(|r| r.is_authoritative()).count();

    let scored: Vec<ScoredParticipant> = records.into_iter().filter_map(score_record).collect();

    info!(
        "Scored {} of {} records ({} with provided scores)",
        scored.len(),
        total,
        authoritative
    );

    ranking::rank(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Milestone, ProvidedScore};

    #[test]
    fn test_local_scoring() {
        let scored = score_record(RawRecord::new("ada").with_counts(10, 8, 44, 16)).unwrap();
        assert_eq!(scored.score, 65);
        assert_eq!(scored.milestone, Milestone::M4);
        assert_eq!(scored.name, "ada");
    }

    #[test]
    fn test_provided_score_used_verbatim() {
        let mut record = RawRecord::new("grace").with_counts(10, 8, 44, 16);
        record.provided = Some(ProvidedScore {
            score: Some(3),
            milestone: Milestone::M1,
        });

        let scored = score_record(record).unwrap();
        assert_eq!(scored.score, 3);
        assert_eq!(scored.milestone, Milestone::M1);
    }

    #[test]
    fn test_non_numeric_provided_score_excluded() {
        let mut bad = RawRecord::new("bad");
        bad.provided = Some(ProvidedScore {
            score: None,
            milestone: Milestone::None,
        });

        let board = build_leaderboard(vec![
            RawRecord::new("low").with_counts(1, 0, 0, 0),
            bad,
            RawRecord::new("high").with_counts(5, 5, 10, 4),
        ]);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].participant.name, "high");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].participant.name, "low");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn test_zero_records_are_kept() {
        let board = build_leaderboard(vec![RawRecord::default()]);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].participant.name, "Unknown");
        assert_eq!(board[0].participant.score, 0);
    }
}
