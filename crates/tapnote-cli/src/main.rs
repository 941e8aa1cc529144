//! `tapnote`: offline note taking in the terminal.
//!
//! # Usage
//!
//! ```
//! tapnote
//! tapnote --config ~/.config/tapnote/config.toml --data-dir /tmp/notes
//! ```

mod app;
mod client;
mod config;
mod location;
mod ui;

use std::{
  fs::File,
  io,
  path::PathBuf,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tapnote_media::CommandPicker;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  app::{App, Services},
  client::Geocoder,
  config::AppConfig,
  location::FixedLocator,
};

type TapApp = App<CommandPicker, FixedLocator>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tapnote", version, about = "Offline notes with photos")]
struct Args {
  /// Path to a TOML config file (default: ~/.config/tapnote/config.toml).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Directory holding the note database.
  #[arg(long, env = "TAPNOTE_DATA_DIR")]
  data_dir: Option<PathBuf>,

  /// Where log output goes; the terminal belongs to the UI.
  #[arg(long, env = "TAPNOTE_LOG_FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let config_path = args.config.unwrap_or_else(crate::config::default_config_path);
  let mut cfg = AppConfig::load(&config_path)
    .with_context(|| format!("loading config {}", config_path.display()))?;
  if let Some(dir) = args.data_dir {
    cfg.data_dir = crate::config::expand_tilde(&dir);
  }
  if let Some(file) = args.log_file {
    cfg.log_file = crate::config::expand_tilde(&file);
  }

  init_tracing(&cfg)?;
  tracing::info!(data_dir = %cfg.data_dir.display(), "starting tapnote");

  let geocoder = if cfg.geocode.api_key.is_empty() {
    None
  } else {
    Some(Geocoder::new(&cfg.geocode)?)
  };
  let services = Services {
    picker: CommandPicker::new(&cfg.picker.command).context("configuring photo picker")?,
    locator: FixedLocator::new(cfg.location.as_ref()),
    geocoder,
  };
  let mut app = App::new(cfg.db_options()?, services);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.open_store(cfg.db_version).await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn init_tracing(cfg: &AppConfig) -> Result<()> {
  if let Some(parent) = cfg.log_file.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating log directory {}", parent.display()))?;
  }
  let file = File::options()
    .create(true)
    .append(true)
    .open(&cfg.log_file)
    .with_context(|| format!("opening log file {}", cfg.log_file.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut TapApp,
) -> Result<()> {
  loop {
    app.process_pending_events();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  tracing::info!("bye");
  Ok(())
}
