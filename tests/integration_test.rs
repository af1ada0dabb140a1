use arcade_leaderboard::{
    config::Settings,
    models::{Milestone, RawRecord},
    refresh::{LeaderboardState, RefreshOutcome, Refresher},
    scoring::{self, badges},
    server::{self, AppState},
    sources::DataSourceResolver,
};
use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const CSV_HEADER: &str = "Name,# of Arcade Games Completed,# of Trivia Games Completed,# of Skill Badges Completed,# of Lab-free Courses Completed";

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn temp_file(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "leaderboard-it-{}-{}.csv",
        tag,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

fn settings_for(base_url: &str, fallbacks: Vec<String>) -> Settings {
    let mut settings = Settings::default();
    settings.sources.api_base_url = base_url.to_string();
    settings.sources.fallbacks = fallbacks;
    settings.sources.timeout_seconds = 5;
    settings.retry.base_delay_ms = 10;
    settings
}

async fn load(settings: &Settings) -> (RefreshOutcome, Refresher) {
    let resolver = DataSourceResolver::from_settings(settings).unwrap();
    let refresher = Refresher::new(Arc::new(resolver), Arc::new(LeaderboardState::new()));
    let outcome = refresher.refresh().await;
    (outcome, refresher)
}

#[test]
fn test_scoring_examples() {
    let top = scoring::score(&RawRecord::new("a").with_counts(10, 8, 44, 16));
    assert_eq!(top.score, 65);
    assert_eq!(top.milestone, Milestone::M4);

    let none = scoring::score(&RawRecord::new("b").with_counts(3, 3, 3, 3));
    assert_eq!(none.score, 7);
    assert_eq!(none.milestone, Milestone::None);

    let board = scoring::build_leaderboard(vec![
        RawRecord::new("a").with_counts(10, 0, 0, 0),
        RawRecord::new("b").with_counts(30, 0, 0, 0),
        RawRecord::new("c").with_counts(30, 0, 0, 0),
        RawRecord::new("d").with_counts(5, 0, 0, 0),
    ]);
    let order: Vec<(&str, u32, usize)> = board
        .iter()
        .map(|r| (r.participant.name.as_str(), r.participant.score, r.rank))
        .collect();
    assert_eq!(
        order,
        vec![("b", 30, 1), ("c", 30, 2), ("a", 10, 3), ("d", 5, 4)]
    );
}

#[test]
fn test_badge_tally_scores_like_records() {
    let mut titles = vec!["Level 1: Core Infrastructure"; 4];
    titles.extend(vec!["The Arcade Trivia Week 1"; 4]);
    titles.extend(vec!["Build a Data Mesh with Dataplex"; 10]);
    titles.extend(vec!["Google Docs"; 4]);

    let record = badges::tally("ada", titles);
    let result = scoring::score(&record);

    assert_eq!(record.arcade_games, 4);
    assert_eq!(record.trivia_games, 4);
    assert_eq!(record.skill_badges, 10);
    assert_eq!(record.lab_free_courses, 4);
    assert_eq!(result.milestone, Milestone::M1);
    assert_eq!(result.score, 4 + 4 + 5 + 2);
}

#[tokio::test]
async fn test_primary_json_is_authoritative() {
    let app = Router::new().route(
        "/api/leaderboard",
        get(|| async {
            Json(json!([
                {"name": "Ada", "game_badges": 1, "trivia_badges": 0, "skill_badges": 0,
                 "lab_badges": 0, "total_points": "99", "milestone": "Milestone 3"},
                {"name": "Grace", "game_badges": 10, "trivia_badges": 8, "skill_badges": 44,
                 "lab_badges": 16},
                {"name": "Broken", "game_badges": 5, "total_points": "n/a"}
            ]))
        }),
    );
    let base = spawn_server(app).await;

    let (outcome, refresher) = load(&settings_for(&base, vec![])).await;
    assert!(outcome.is_committed());

    let snapshot = refresher.state().snapshot();
    assert_eq!(snapshot.source.as_deref(), Some(format!("{}/api/leaderboard", base).as_str()));

    let board: Vec<(&str, u32, Milestone)> = snapshot
        .participants
        .iter()
        .map(|r| (r.participant.name.as_str(), r.participant.score, r.participant.milestone))
        .collect();
    assert_eq!(
        board,
        vec![("Ada", 99, Milestone::M3), ("Grace", 65, Milestone::M4)]
    );
}

#[tokio::test]
async fn test_falls_back_through_static_sources() {
    let csv = format!("{}\nLow,1,0,0,0\nHigh,4,4,10,4\n", CSV_HEADER);
    let app = Router::new()
        .route(
            "/api/leaderboard",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/data.csv", get(move || async move { csv }));
    let base = spawn_server(app).await;

    let remote = format!("{}/data.csv", base);
    let settings = settings_for(
        &base,
        vec!["definitely/missing/data.csv".to_string(), remote.clone()],
    );

    let (outcome, refresher) = load(&settings).await;
    assert_eq!(
        outcome,
        RefreshOutcome::Committed {
            generation: 1,
            participants: 2,
            source: remote,
        }
    );

    let snapshot = refresher.state().snapshot();
    assert_eq!(snapshot.participants[0].participant.name, "High");
    assert_eq!(snapshot.participants[0].participant.score, 4 + 4 + 5 + 2);
    assert_eq!(snapshot.participants[0].participant.milestone, Milestone::M1);
}

#[tokio::test]
async fn test_html_fallback_is_rejected() {
    let app = Router::new().route(
        "/data.csv",
        get(|| async { "<!doctype html><html><body>Not here</body></html>" }),
    );
    let base = spawn_server(app).await;
    let local = temp_file("after-html", &format!("{}\nAda,4,4,10,4\n", CSV_HEADER));

    let settings = settings_for(
        &base,
        vec![
            format!("{}/data.csv", base),
            local.to_string_lossy().into_owned(),
        ],
    );

    let (outcome, refresher) = load(&settings).await;
    let _ = std::fs::remove_file(&local);

    assert!(outcome.is_committed());
    let snapshot = refresher.state().snapshot();
    assert_eq!(snapshot.source.as_deref(), Some(local.to_string_lossy().as_ref()));
    assert_eq!(snapshot.participants[0].participant.name, "Ada");
}

#[tokio::test]
async fn test_all_sources_failing_reports_each_attempt() {
    let settings = settings_for(
        "http://127.0.0.1:9",
        vec!["definitely/missing/a.csv".to_string()],
    );

    let (outcome, refresher) = load(&settings).await;
    match outcome {
        RefreshOutcome::Failed { error, .. } => assert_eq!(error, "All 2 data sources failed"),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!refresher.state().snapshot().has_data());
}

#[tokio::test]
async fn test_primary_is_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let app = Router::new().route(
        "/api/leaderboard",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    (StatusCode::SERVICE_UNAVAILABLE, "[]".to_string())
                } else {
                    (StatusCode::OK, json!([{"name": "Ada", "game_badges": 2}]).to_string())
                }
            }
        }),
    );
    let base = spawn_server(app).await;

    let mut settings = settings_for(&base, vec![]);
    settings.retry.max_attempts = 3;

    let (outcome, _) = load(&settings).await;
    assert!(outcome.is_committed());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_backend_serves_what_clients_consume() {
    let data = temp_file(
        "backend",
        &format!("{}\nAda,10,8,44,16\nGrace,4,4,10,4\n", CSV_HEADER),
    );

    let mut backend_settings = Settings::default();
    backend_settings.server.data_files = vec![data.to_string_lossy().into_owned()];
    let state = AppState::from_settings(&backend_settings).unwrap();
    assert!(state.refresher.refresh().await.is_committed());
    let base = spawn_server(server::routes(state)).await;

    let (outcome, refresher) = load(&settings_for(&base, vec![])).await;
    let _ = std::fs::remove_file(&data);
    assert!(outcome.is_committed());

    let snapshot = refresher.state().snapshot();
    let board: Vec<(&str, u32, Milestone)> = snapshot
        .participants
        .iter()
        .map(|r| (r.participant.name.as_str(), r.participant.score, r.participant.milestone))
        .collect();
    assert_eq!(
        board,
        vec![("Ada", 65, Milestone::M4), ("Grace", 15, Milestone::M1)]
    );
}

#[tokio::test]
async fn test_resolver_honours_cancellation() {
    let app = Router::new().route(
        "/api/leaderboard",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            "[]"
        }),
    );
    let base = spawn_server(app).await;
    let resolver = DataSourceResolver::from_settings(&settings_for(&base, vec![])).unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = resolver.resolve(&token).await.unwrap_err();
    assert!(err.is_cancelled());
}
