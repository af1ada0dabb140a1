use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use arcade_leaderboard::{
    config::Settings,
    models::LeaderboardEntry,
    refresh::{LeaderboardState, RefreshOutcome, Refresher},
    scoring::{self, badges},
    server,
    sources::{DataSourceResolver, HealthCheck, SourceClientConfig},
};

mod tui_main;

#[derive(Parser)]
#[clap(name = "arcade-leaderboard")]
#[clap(about = "Rank arcade participants by badge milestones", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/default and config/local)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the leaderboard once and print it
    Show {
        /// Only print the top N participants
        #[clap(short, long)]
        limit: Option<usize>,

        /// Print the API JSON payload instead of a table
        #[clap(long)]
        json: bool,
    },

    /// Launch interactive TUI
    Tui,

    /// Serve the leaderboard backend
    Serve {
        /// Port to listen on
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Classify badge titles and score them
    Tally {
        /// Participant name
        #[clap(short, long, default_value = "Unknown")]
        name: String,

        /// File with one badge title per line
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Badge titles
        titles: Vec<String>,
    },

    /// Check the leaderboard API health endpoint
    Health {
        /// Endpoint to check (defaults to the configured API)
        #[clap(short, long)]
        url: Option<String>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Settings::new().context("Failed to load configuration")?,
    };

    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;

    if !matches!(cli.command, Commands::Tui) {
        init_logging(&settings.app.log_level);
    }

    match cli.command {
        Commands::Show { limit, json } => show(&settings, limit, json).await?,

        Commands::Tui => tui_main::run_tui(&settings).await?,

        Commands::Serve { port } => {
            let mut settings = settings;
            if let Some(port) = port {
                settings.server.port = port;
            }

            let shutdown = CancellationToken::new();
            let signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown requested");
                }
                signal.cancel();
            });

            server::run(&settings, shutdown).await?;
        }

        Commands::Tally {
            name,
            file,
            mut titles,
        } => {
            if let Some(path) = file {
                let contents = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                titles.extend(
                    contents
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(String::from),
                );
            }

            let record = badges::tally(&name, titles.iter().map(String::as_str));
            let result = scoring::score(&record);

            println!("\n=== Badge Tally: {} ===", record.name);
            for title in &titles {
                println!("  [{}] {}", badges::classify(title).as_str(), title);
            }
            println!();
            println!("Arcade games:         {}", record.arcade_games);
            println!("Special arcade games: {}", record.special_arcade_games);
            println!("Trivia games:         {}", record.trivia_games);
            println!("Skill badges:         {}", record.skill_badges);
            println!("Lab-free courses:     {}", record.lab_free_courses);
            println!("\nTotal points: {}", result.score);
            println!("Milestone:    {}", result.milestone);
        }

        Commands::Health { url } => {
            let url = url.unwrap_or_else(|| settings.health_url());
            let health = HealthCheck::new(url, &SourceClientConfig::from_settings(&settings))?;
            if health.check().await {
                println!("✅ {} is healthy", health.url());
            } else {
                return Err(anyhow!("{} is not healthy", health.url()));
            }
        }
    }

    Ok(())
}

async fn show(settings: &Settings, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let resolver = DataSourceResolver::from_settings(settings)?;
    info!("Sources: {}", resolver.source_names().join(", "));

    let refresher = Refresher::new(Arc::new(resolver), Arc::new(LeaderboardState::new()));
    match refresher.refresh().await {
        RefreshOutcome::Committed { .. } => {}
        RefreshOutcome::Failed { error, .. } => {
            error!("Failed to load leaderboard: {}", error);
            return Err(anyhow!(error));
        }
        other => {
            warn!("Refresh ended without data: {:?}", other);
            return Err(anyhow!("Leaderboard refresh did not complete"));
        }
    }

    let snapshot = refresher.state().snapshot();
    let shown = limit.unwrap_or(snapshot.participants.len());
    let participants = snapshot.participants.iter().take(shown);

    if json {
        let entries: Vec<LeaderboardEntry> = participants
            .map(|p| LeaderboardEntry::from(&p.participant))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "\n=== Arcade Leaderboard ({} participants, from {}) ===",
        snapshot.participants.len(),
        snapshot.source.as_deref().unwrap_or("unknown")
    );
    println!("{:>5}  {:<32} {:>7}  {}", "Rank", "Name", "Points", "Milestone");
    for entry in participants {
        let p = &entry.participant;
        println!("{:>5}  {:<32} {:>7}  {}", entry.rank, p.name, p.score, p.milestone);
    }

    Ok(())
}
