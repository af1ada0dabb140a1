use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Write},
    sync::Arc,
};
use tokio_util::sync::CancellationToken;

use arcade_leaderboard::{
    config::Settings,
    refresh::{spawn_periodic, LeaderboardState, Refresher},
    sources::DataSourceResolver,
    tui::{ui, Action, App, Event as TuiEvent, EventHandler},
};

pub async fn run_tui(settings: &Settings) -> Result<()> {
    // Log output would corrupt the alternate screen
    disable_logging_output();

    let resolver = DataSourceResolver::from_settings(settings)?;
    let refresher = Arc::new(Refresher::new(
        Arc::new(resolver),
        Arc::new(LeaderboardState::new()),
    ));

    let mut terminal = setup_terminal(io::stdout())?;

    let shutdown = CancellationToken::new();
    let scheduler = spawn_periodic(
        Arc::clone(&refresher),
        settings.refresh_interval(),
        shutdown.clone(),
    );

    let events = EventHandler::new(250);
    let res = run_app(&mut terminal, &refresher, events);

    shutdown.cancel();
    let _ = scheduler.await;

    // Always restore terminal state, even if there was an error
    restore_terminal(&mut terminal)?;

    if let Err(err) = res {
        eprintln!("Application error: {}", err);
        Err(err)
    } else {
        Ok(())
    }
}

/// Enters raw mode and the alternate screen. Any failure part way leaves
/// the terminal as it was found.
fn setup_terminal<W: Write>(writer: W) -> Result<Terminal<CrosstermBackend<W>>> {
    enable_raw_mode()?;

    let setup = enter_alternate_screen(writer);
    if setup.is_err() {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
    setup
}

fn enter_alternate_screen<W: Write>(mut writer: W) -> Result<Terminal<CrosstermBackend<W>>> {
    execute!(writer, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(writer))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal<W: Write>(terminal: &mut Terminal<CrosstermBackend<W>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn disable_logging_output() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let null_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::sink)
        .with_filter(tracing_subscriber::filter::LevelFilter::OFF);

    let _ = tracing_subscriber::registry().with(null_layer).try_init();
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    refresher: &Arc<Refresher>,
    events: EventHandler,
) -> Result<()> {
    let mut app = App::new();

    loop {
        app.update(refresher.state().snapshot());
        terminal.draw(|f| ui::draw(f, &app))?;

        match events.next()? {
            TuiEvent::Key(key) => {
                if let Some(Action::Refresh) = app.handle_key(key) {
                    refresher.spawn_refresh();
                }
            }
            TuiEvent::Resize(_, _) | TuiEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
