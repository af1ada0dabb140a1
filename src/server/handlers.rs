use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::io::ErrorKind;
use tracing::{debug, info};

use crate::models::LeaderboardEntry;
use crate::server::{
    error::{WebError, WebResult},
    AppState,
};

pub async fn get_leaderboard(State(app): State<AppState>) -> WebResult<Response> {
    let snapshot = app.refresher.state().snapshot();
    if !snapshot.has_data() {
        return Err(WebError::NotFound("Leaderboard data not found".to_string()));
    }

    let entries: Vec<LeaderboardEntry> = snapshot
        .participants
        .iter()
        .map(|p| LeaderboardEntry::from(&p.participant))
        .collect();

    debug!("Serving {} leaderboard entries", entries.len());
    Ok(Json(entries).into_response())
}

/// Serves the first configured data file that exists.
pub async fn get_csv(State(app): State<AppState>) -> WebResult<Response> {
    for path in app.data_files.iter() {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                debug!("Serving {} ({} bytes)", path.display(), bytes.len());
                return Ok(([(header::CONTENT_TYPE, "text/csv")], bytes).into_response());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(WebError::NotFound("CSV file not found".to_string()))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn trigger_refresh(State(app): State<AppState>) -> Json<serde_json::Value> {
    info!("Manual refresh requested");
    app.refresher.spawn_refresh();
    Json(json!({ "status": "Refresh started" }))
}
