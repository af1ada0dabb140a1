pub mod error;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{join_url, Settings};
use crate::models::{LeaderboardError, Result};
use crate::refresh::{spawn_keep_alive, spawn_periodic, LeaderboardState, Refresher};
use crate::sources::{DataSourceResolver, HealthCheck, SourceClientConfig};

pub use error::{WebError, WebResult};
pub use routes::routes;

#[derive(Clone)]
pub struct AppState {
    pub refresher: Arc<Refresher>,
    pub data_files: Arc<Vec<PathBuf>>,
}

impl AppState {
    pub fn new(refresher: Arc<Refresher>, data_files: Vec<PathBuf>) -> Self {
        Self {
            refresher,
            data_files: Arc::new(data_files),
        }
    }

    /// Backend state fed from the configured data files.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let resolver = DataSourceResolver::from_files(&settings.server.data_files, settings)?;
        let refresher = Refresher::new(Arc::new(resolver), Arc::new(LeaderboardState::new()));
        let data_files = settings.server.data_files.iter().map(PathBuf::from).collect();

        Ok(Self::new(Arc::new(refresher), data_files))
    }
}

/// Runs the backend until `shutdown` fires: periodic refresh, optional
/// keep-alive pings and the HTTP listener.
pub async fn run(settings: &Settings, shutdown: CancellationToken) -> Result<()> {
    let state = AppState::from_settings(settings)?;

    // Bind first so a bad address fails before any background task starts.
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| LeaderboardError::ConfigError(format!("Invalid server address: {}", e)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Leaderboard backend listening on {}", addr);

    let keep_alive_check = match &settings.server.keep_alive_url {
        Some(url) => Some(HealthCheck::new(
            join_url(url, &settings.sources.health_path),
            &SourceClientConfig::from_settings(settings),
        )?),
        None => None,
    };

    let refresh_task = spawn_periodic(
        Arc::clone(&state.refresher),
        settings.refresh_interval(),
        shutdown.clone(),
    );
    let keep_alive_task = keep_alive_check.map(|health| {
        spawn_keep_alive(
            health,
            std::time::Duration::from_secs(settings.server.keep_alive_interval_seconds),
            shutdown.clone(),
        )
    });

    let app = routes(state);
    let server_shutdown = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
        .await;

    shutdown.cancel();
    let _ = refresh_task.await;
    if let Some(task) = keep_alive_task {
        let _ = task.await;
    }

    served?;
    info!("Leaderboard backend stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn temp_csv(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "leaderboard-server-{}-{}.csv",
            tag,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn app_for(files: Vec<PathBuf>) -> AppState {
        let mut settings = Settings::default();
        settings.server.data_files = files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        AppState::from_settings(&settings).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = routes(app_for(vec![])).oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_leaderboard_not_found_before_first_load() {
        let response = routes(app_for(vec![]))
            .oneshot(get("/api/leaderboard"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Leaderboard data not found" })
        );
    }

    #[tokio::test]
    async fn test_leaderboard_after_refresh() {
        let path = temp_csv(
            "board",
            "Name,# of Arcade Games Completed,# of Trivia Games Completed,# of Skill Badges Completed,# of Lab-free Courses Completed\n\
             Low,1,0,0,0\n\
             High,10,8,44,16\n",
        );
        let state = app_for(vec![path.clone()]);
        assert!(state.refresher.refresh().await.is_committed());

        let response = routes(state).oneshot(get("/api/leaderboard")).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "High");
        assert_eq!(body[0]["total_points"], 65);
        assert_eq!(body[0]["milestone"], "M4");
        assert_eq!(body[1]["name"], "Low");
        assert_eq!(body[1]["milestone"], "None");
    }

    #[tokio::test]
    async fn test_csv_served_from_first_existing_file() {
        let missing = std::env::temp_dir().join("leaderboard-server-missing.csv");
        let path = temp_csv("raw", "Name\nAda\n");

        let response = routes(app_for(vec![missing, path.clone()]))
            .oneshot(get("/api/csv"))
            .await
            .unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[axum::http::header::CONTENT_TYPE], "text/csv");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Name\nAda\n");
    }

    #[tokio::test]
    async fn test_csv_not_found() {
        let missing = std::env::temp_dir().join("leaderboard-server-absent.csv");
        let response = routes(app_for(vec![missing]))
            .oneshot(get("/api/csv"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "CSV file not found" })
        );
    }

    #[tokio::test]
    async fn test_run_fails_fast_on_bad_address() {
        let mut settings = Settings::default();
        settings.server.host = "not an address".to_string();
        let shutdown = CancellationToken::new();

        let err = run(&settings, shutdown.clone()).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::ConfigError(_)));
        assert!(!shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut settings = Settings::default();
        settings.server.host = "127.0.0.1".to_string();
        settings.server.port = 0;
        settings.server.data_files = vec![];
        let shutdown = CancellationToken::new();

        let server = tokio::spawn({
            let settings = settings.clone();
            let shutdown = shutdown.clone();
            async move { run(&settings, shutdown).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        shutdown.cancel();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("backend did not stop after shutdown")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_endpoint() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/refresh")
            .body(Body::empty())
            .unwrap();

        let response = routes(app_for(vec![])).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "status": "Refresh started" })
        );
    }
}
