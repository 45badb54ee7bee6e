//! quakefeed — a terminal list of recent earthquakes from a GeoJSON feed.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  LoadMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread)  │  (channel) │ (state)  │          │ (render) │
//! └───────────┘            └──────────┘          └──────────┘
//!       │ load()             ▲      │ row_at()
//!       ▼                    │      ▼
//! ┌───────────┐     ┌──────────┐  ┌────────────┐
//! │  source/  │     │ input.rs │  │ adapter.rs │
//! └───────────┘     └──────────┘  └────────────┘
//! ```
//!
//! * **`source/`** — fetch (`reqwest`), GeoJSON decode, and the repository
//!   that turns every failure into an empty list.
//! * **`loader`** — runs each load on a background thread; results carry a
//!   generation so stale ones can be dropped.
//! * **`adapter`** — binds records to reusable row surfaces on demand.
//! * **`app`** — owns all application state (rows, selection, status).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** — feed URL, log file and network limits from arguments /
//!   environment.
//! * **`main`** — wires everything together and runs the event loop.

mod adapter;
mod app;
mod config;
mod input;
mod loader;
mod source;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use loader::Loader;
use source::{FeedRepository, HttpFetcher};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Enters raw mode + alternate screen on construction and restores the
/// terminal on [`Drop`], including during unwinding.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send tracing output to the configured file.  The terminal belongs to the
/// UI, so without a file nothing is logged.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    init_logging(&config)?;
    install_panic_hook();

    let fetcher = HttpFetcher::with_timeouts(config.connect_timeout, config.read_timeout)
        .context("Failed to build HTTP client")?
        .max_body_size(config.max_body_size);
    let loader = Loader::new(FeedRepository::new(fetcher));

    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    app.load_started(loader.request(&config.feed_url));

    // ~10 fps: drain finished loads, render, then wait up to one tick for
    // a key.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Some(msg) = loader.try_recv() {
            let generation = msg.generation;
            if !app.apply_load(msg) {
                tracing::debug!(generation, "ignored superseded load");
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        // `request_reload` only sets this when no load is in flight.
        if app.reload_requested {
            app.reload_requested = false;
            app.load_started(loader.request(&config.feed_url));
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
