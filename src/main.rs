//! NUA Files TUI - a terminal client for the NUA file storage and
//! sharing service.
//!
//! Provides a fast, keyboard-driven interface for managing files,
//! sharing them with other users, and reviewing the audit trail.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use ui::input::handle_input;
use ui::render::render;

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 && args[1] == "--link" {
        return open_share_link(&args[2]).await;
    }

    init_tracing();
    info!("NUA Files TUI starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and start restoring any persisted session
    let mut app = App::new()?;
    app.start_restore();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("NUA Files TUI shutting down");
    Ok(())
}

/// Resolve a share-link token without signing in: print the file's
/// metadata and download it into the current directory. Links work
/// anonymously; the server rejects expired ones.
async fn open_share_link(link_token: &str) -> Result<()> {
    let config = config::Config::load().unwrap_or_default();
    let client = api::ApiClient::new(&config.api_url(), api::TokenCell::new())?;

    let file = client.link_info(link_token).await?;
    eprintln!("{} ({})", file.filename, utils::format_size(file.size));
    if let Some(owner) = &file.owner {
        eprintln!("Shared by {} <{}>", owner.full_name, owner.email);
    }

    let bytes = client.download_via_link(link_token).await?;
    let dest = std::path::PathBuf::from(&file.filename);
    std::fs::write(&dest, bytes)?;
    eprintln!("Saved to {}", dest.display());
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();
    }
}
