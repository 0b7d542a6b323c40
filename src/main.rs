//! newsdrawer — a terminal news reader with a category drawer.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  LoadMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (worker)  │  (channel) │ (state)  │          │ (render) │
//! └───────────┘            └──────────┘          └──────────┘
//!       ▲                     ▲    │ bind rows
//!       │ fetch               │    ▼
//! ┌───────────┐      ┌──────────┐ ┌───────────┐
//! │ source/   │      │ input.rs │ │ render.rs │──► time_fmt.rs
//! └───────────┘      └──────────┘ └───────────┘──► thumbs.rs
//! ```
//!
//! * **`source/`** — the `NewsSource` trait, `Query`, and the Guardian
//!   implementation.
//! * **`loader`** — runs one fetch per request on the worker lane and drops
//!   superseded results.
//! * **`nav`** — the navigation shell: current category, title, overlays.
//! * **`render`** — binds articles into reusable row slots.
//! * **`time_fmt`** — "42 minutes ago".
//! * **`thumbs`** — thumbnail download + decode, cached per URI.
//! * **`app`** — owns all application state.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse config, start logging,
//!   set up the terminal, and run the event loop.

mod app;
mod cli;
mod input;
mod loader;
mod nav;
mod render;
mod settings;
mod source;
mod thumbs;
mod time_fmt;
mod ui;

use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, Endpoint};
use cli::Config;
use loader::Loader;
use source::GuardianSource;
use thumbs::{HttpImageFetch, ThumbnailCache};

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
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

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Log to a file; stdout belongs to the UI.  `RUST_LOG` overrides the
/// default `info` level.
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;
    install_panic_hook();
    info!(endpoint = %config.endpoint, "newsdrawer starting up");

    // -- worker lane ---------------------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("newsdrawer-worker")
        .enable_all()
        .build()
        .context("starting worker runtime")?;

    let source = Arc::new(GuardianSource::new("Guardian")?);
    let (loader, rx) = Loader::new(source, runtime.handle().clone());
    let thumbs = ThumbnailCache::new(Arc::new(HttpImageFetch::new()?), runtime.handle().clone());

    let endpoint = Endpoint {
        url: config.endpoint.clone(),
        api_key: config.api_key.clone(),
    };
    let mut app = App::new(endpoint, config.settings(), loader, thumbs);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    app.start();

    // -- main event loop -----------------------------------------------------
    // ~10 fps.  Each iteration drains loader messages, renders, then waits
    // up to one tick for a key.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("newsdrawer shutting down");
    drop(guard);
    // Don't wait on fetches that are still running.
    runtime.shutdown_background();
    Ok(())
}
