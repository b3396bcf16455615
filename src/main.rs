mod config;
mod data;
mod error;
mod forecast;
mod pipeline;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

use config::{Config, EnvConfig};
use data::cache::SeriesCache;
use data::fetcher::Fetcher;
use data::trends::TrendsClient;
use forecast::mstl::MstlForecaster;
use pipeline::Pipeline;
use ui::app::{App, RunRequest};
use ui::event::{handle_key_event, poll_event};
use ui::layout::draw_ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_config = EnvConfig::load()?;
    init_tracing(&env_config.log_file)?;

    tracing::info!("🚀 Trends forecast dashboard starting...");

    let config = Config::load(&env_config.config_path)?;
    tracing::info!("Sites: {}", config.sites.allowed.join(", "));
    tracing::info!(
        "Model: {}h horizon, {}h season, min {} points",
        config.model.horizon_hours,
        config.model.seasonal_period_hours,
        config.model.min_points
    );

    let client = TrendsClient::new(
        env_config.trends_base_url.clone(),
        env_config.trends_hl.clone(),
        env_config.trends_tz,
        env_config.trends_geo.clone(),
    )?;
    let fetcher = Fetcher::new(
        Arc::new(client),
        config.sites.allowed.clone(),
        SeriesCache::new(config.cache.ttl()),
        config.fetch.delay(),
        config.fetch.timeout(),
        config.fetch.gap_fill,
    );
    let pipeline = Pipeline::new(
        fetcher,
        Box::new(MstlForecaster::new(config.model.clone())),
        config.model.horizon_hours,
    );
    let mut app = App::new(pipeline.sites().to_vec(), config.ui.clone());
    tracing::info!(
        "✅ Dashboard ready: {} sites, forecasting {}h ahead",
        pipeline.sites().len(),
        pipeline.horizon_hours()
    );

    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &mut app, &pipeline).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("Dashboard exited with error: {:#}", err);
        eprintln!("Error: {:#}", err);
    }

    tracing::info!("Shutting down...");
    result
}

/// Raw mode and the alternate screen; a failure part way leaves the
/// terminal as it was.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    undo_on_err(execute!(stdout, EnterAlternateScreen), || {
        let _ = disable_raw_mode();
    })?;
    let terminal = undo_on_err(Terminal::new(CrosstermBackend::new(stdout)), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

/// Run `cleanup` if `result` failed, then pass the result through.
fn undo_on_err<T>(result: io::Result<T>, cleanup: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        cleanup();
    }
    result
}

/// Logs go to a file; the terminal belongs to the dashboard.
fn init_tracing(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    pipeline: &Pipeline,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if let Some(request) = app.take_pending() {
            let site = app.selected_site().to_string();
            match request {
                RunRequest::Refetch if pipeline.invalidate(&site) => {
                    tracing::info!("🔄 Dropped cached series for {}", site);
                }
                RunRequest::RefetchAll => {
                    tracing::info!("🔄 Dropped {} cached series", pipeline.clear_cache());
                }
                _ => {}
            }
            let result = pipeline.run(&site, app.period).await;
            app.apply_result(result);
            continue;
        }

        app.clear_expired_status();

        if let Some(event) = poll_event(tick_rate)? {
            match event {
                Event::Key(key) => handle_key_event(app, key),
                Event::Resize(_, _) => {} // Redrawn on the next pass
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
