//! Parsing of the two payload shapes a source can deliver: the JSON array
//! served by the leaderboard API and CSV exports with a header row.

use serde_json::{Map, Value};

use crate::config::{ColumnIndex, ColumnMapping};
use crate::models::{
    coerce_count, coerce_count_value, coerce_text, coerce_value, normalize_name, Milestone,
    ProvidedScore, RawRecord, SourceError,
};

const SCORE_FIELD: &str = "total_points";
const MILESTONE_FIELD: &str = "milestone";

fn json_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => normalize_name(Some(s)),
        Some(Value::Number(n)) => n.to_string(),
        _ => normalize_name(None),
    }
}

fn json_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn json_record(object: &Map<String, Value>) -> RawRecord {
    let provided = object.contains_key(SCORE_FIELD).then(|| ProvidedScore {
        score: coerce_value(object.get(SCORE_FIELD)),
        milestone: object
            .get(MILESTONE_FIELD)
            .and_then(Value::as_str)
            .map(Milestone::from_label)
            .unwrap_or_default(),
    });

    RawRecord {
        name: json_name(object.get("name")),
        arcade_games: coerce_count_value(object.get("game_badges")),
        special_arcade_games: coerce_count_value(object.get("special_game_badges")),
        trivia_games: coerce_count_value(object.get("trivia_badges")),
        skill_badges: coerce_count_value(object.get("skill_badges")),
        lab_free_courses: coerce_count_value(object.get("lab_badges")),
        profile_url: json_string(object.get("profile_url")),
        provided,
    }
}

/// Parses the leaderboard API body: a JSON array of participant objects.
/// Entries that are not objects are skipped.
pub fn parse_json(source_name: &str, body: &str) -> Result<Vec<RawRecord>, SourceError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SourceError::parse(source_name, e))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(SourceError::parse(
                source_name,
                format!("expected a JSON array, got {}", json_kind(&other)),
            ))
        }
    };

    Ok(entries
        .iter()
        .filter_map(Value::as_object)
        .map(json_record)
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn csv_record(row: &csv::StringRecord, index: &ColumnIndex) -> RawRecord {
    let field = |i: Option<usize>| i.and_then(|i| row.get(i));
    let count = |i: Option<usize>| field(i).map(coerce_count).unwrap_or(0);

    let provided = index.score.map(|_| ProvidedScore {
        score: field(index.score).and_then(coerce_text),
        milestone: field(index.milestone)
            .map(Milestone::from_label)
            .unwrap_or_default(),
    });

    RawRecord {
        name: normalize_name(field(index.name)),
        arcade_games: count(index.arcade_games),
        special_arcade_games: count(index.special_arcade_games),
        trivia_games: count(index.trivia_games),
        skill_badges: count(index.skill_badges),
        lab_free_courses: count(index.lab_free_courses),
        profile_url: field(index.profile_url)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        provided,
    }
}

/// Parses delimited text with a header row. Columns are located through
/// `mapping`; a header row matching none of the badge count columns is
/// rejected so that an error page served with a success status does not
/// pass for an empty leaderboard.
pub fn parse_csv(
    source_name: &str,
    text: &str,
    mapping: &ColumnMapping,
) -> Result<Vec<RawRecord>, SourceError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::parse(source_name, e))?
        .clone();
    let index = mapping.resolve(headers.iter());

    if index.has_no_counts() {
        return Err(SourceError::parse(
            source_name,
            "header row has no recognised badge columns",
        ));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| SourceError::parse(source_name, e))?;
        records.push(csv_record(&row, &index));
    }

    Ok(records)
}
