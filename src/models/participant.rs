use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Milestone;

pub const UNKNOWN_NAME: &str = "Unknown";

/// Score and milestone supplied by an authoritative source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidedScore {
    /// `None` when the payload carried a score that is not a number.
    pub score: Option<u32>,
    pub milestone: Milestone,
}

/// Participant badge counts as received from a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub name: String,
    pub arcade_games: u32,
    pub special_arcade_games: u32,
    pub trivia_games: u32,
    pub skill_badges: u32,
    pub lab_free_courses: u32,
    pub profile_url: Option<String>,
    pub provided: Option<ProvidedScore>,
}

impl Default for RawRecord {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            arcade_games: 0,
            special_arcade_games: 0,
            trivia_games: 0,
            skill_badges: 0,
            lab_free_courses: 0,
            profile_url: None,
            provided: None,
        }
    }
}

impl RawRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(Some(name)),
            ..Default::default()
        }
    }

    pub fn with_counts(mut self, arcade: u32, trivia: u32, skill: u32, labs: u32) -> Self {
        self.arcade_games = arcade;
        self.trivia_games = trivia;
        self.skill_badges = skill;
        self.lab_free_courses = labs;
        self
    }

    pub fn is_authoritative(&self) -> bool {
        self.provided.is_some()
    }
}

/// A record after scoring. Rank is not stored here; it comes from the
/// position in the ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredParticipant {
    pub name: String,
    pub arcade_games: u32,
    pub special_arcade_games: u32,
    pub trivia_games: u32,
    pub skill_badges: u32,
    pub lab_free_courses: u32,
    pub profile_url: Option<String>,
    pub score: u32,
    pub milestone: Milestone,
}

impl ScoredParticipant {
    pub fn from_record(record: RawRecord, score: u32, milestone: Milestone) -> Self {
        Self {
            name: record.name,
            arcade_games: record.arcade_games,
            special_arcade_games: record.special_arcade_games,
            trivia_games: record.trivia_games,
            skill_badges: record.skill_badges,
            lab_free_courses: record.lab_free_courses,
            profile_url: record.profile_url,
            score,
            milestone,
        }
    }

    /// Badge counts as an unscored record, for tier checks.
    pub fn counts(&self) -> RawRecord {
        RawRecord {
            name: self.name.clone(),
            arcade_games: self.arcade_games,
            special_arcade_games: self.special_arcade_games,
            trivia_games: self.trivia_games,
            skill_badges: self.skill_badges,
            lab_free_courses: self.lab_free_courses,
            profile_url: self.profile_url.clone(),
            provided: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedParticipant {
    pub rank: usize,
    #[serde(flatten)]
    pub participant: ScoredParticipant,
}

/// Entry in the leaderboard API payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub game_badges: u32,
    pub special_game_badges: u32,
    pub trivia_badges: u32,
    pub skill_badges: u32,
    pub lab_badges: u32,
    pub total_points: u32,
    pub milestone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl From<&ScoredParticipant> for LeaderboardEntry {
    fn from(p: &ScoredParticipant) -> Self {
        Self {
            name: p.name.clone(),
            game_badges: p.arcade_games,
            special_game_badges: p.special_arcade_games,
            trivia_badges: p.trivia_games,
            skill_badges: p.skill_badges,
            lab_badges: p.lab_free_courses,
            total_points: p.score,
            milestone: p.milestone.to_string(),
            profile_url: p.profile_url.clone(),
        }
    }
}

pub fn normalize_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}

/// Reads the leading integer of `text` the way a lenient form parser does:
/// leading whitespace and an optional sign, then digits up to the first
/// non-digit. Returns `None` when no digits are present.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    // Saturate instead of failing on absurdly long digit runs.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Count from text, `None` when the text holds no number.
pub fn coerce_text(text: &str) -> Option<u32> {
    parse_leading_int(text).map(clamp_count)
}

/// Badge count from text. Non-numeric or negative input becomes 0.
pub fn coerce_count(text: &str) -> u32 {
    coerce_text(text).unwrap_or(0)
}

/// Badge count from a JSON value. Numbers, numeric strings and anything
/// else (null, bool, containers) map to 0.
pub fn coerce_count_value(value: Option<&Value>) -> u32 {
    coerce_value(value).unwrap_or(0)
}

/// Like [`coerce_count_value`] but keeps the distinction between "not a
/// number" and zero.
pub fn coerce_value(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.min(u32::MAX as u64) as u32)
            } else if let Some(i) = n.as_i64() {
                Some(clamp_count(i))
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| clamp_count(f.trunc() as i64))
            }
        }
        Value::String(s) => coerce_text(s),
        _ => None,
    }
}
