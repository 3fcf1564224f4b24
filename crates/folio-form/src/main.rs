//! `folio`: terminal contact form and inbox for a folio server.
//!
//! # Usage
//!
//! ```
//! folio --url http://localhost:5000
//! folio --config ~/.config/folio/config.toml --log-file /tmp/folio.log
//! FOLIO_SINK=email_relay folio --config relay.toml
//! ```

mod app;
mod client;
mod form;
mod sink;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result, bail};
use app::App;
use clap::{Parser, ValueEnum};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use form::FormEvent;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use sink::{ApiSink, ConfiguredSink, DEFAULT_RELAY_ENDPOINT, EmailRelayConfig, EmailRelaySink, Sink};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "folio", about = "Terminal contact form for a folio server")]
struct Args {
  /// Path to a TOML config file (url, sink, [email_relay]).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the folio server (default: http://localhost:5000).
  #[arg(long, env = "FOLIO_URL")]
  url: Option<String>,

  /// Where submissions are delivered.
  #[arg(long, env = "FOLIO_SINK", value_enum)]
  sink: Option<SinkKind>,

  /// Write logs to this file. The terminal is owned by the UI, so nothing is
  /// logged without it.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
enum SinkKind {
  #[default]
  Api,
  EmailRelay,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:         String,
  sink:        Option<SinkKind>,
  #[serde(default)]
  email_relay: RelaySection,
}

#[derive(Deserialize, Default)]
struct RelaySection {
  service_id:  Option<String>,
  template_id: Option<String>,
  public_key:  Option<String>,
  endpoint:    Option<String>,
}

impl RelaySection {
  fn into_config(self) -> Result<EmailRelayConfig> {
    let missing: Vec<&str> = [
      ("service_id", &self.service_id),
      ("template_id", &self.template_id),
      ("public_key", &self.public_key),
    ]
    .into_iter()
    .filter(|(_, v)| v.as_deref().is_none_or(str::is_empty))
    .map(|(k, _)| k)
    .collect();

    if !missing.is_empty() {
      bail!(
        "sink \"email_relay\" needs {} in the [email_relay] config section",
        missing.join(", ")
      );
    }

    Ok(EmailRelayConfig {
      service_id:  self.service_id.unwrap_or_default(),
      template_id: self.template_id.unwrap_or_default(),
      public_key:  self.public_key.unwrap_or_default(),
      endpoint:    self
        .endpoint
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_RELAY_ENDPOINT.to_string()),
    })
  }
}

/// Everything the client needs once flags and file are merged.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
  base_url: String,
  relay:    Option<EmailRelayConfig>,
}

/// CLI flags override config file, which overrides defaults.
fn resolve(args: &Args, file: ConfigFile) -> Result<Settings> {
  let base_url = args
    .url
    .clone()
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());

  let relay = match args.sink.or(file.sink).unwrap_or_default() {
    SinkKind::Api => None,
    SinkKind::EmailRelay => Some(file.email_relay.into_config()?),
  };

  Ok(Settings { base_url, relay })
}

fn load_config_file(path: Option<&Path>) -> Result<ConfigFile> {
  let Some(path) = path else {
    return Ok(ConfigFile::default());
  };
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).context("parsing config file")
}

fn init_logging(path: Option<&Path>) -> Result<()> {
  let Some(path) = path else {
    return Ok(());
  };
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_logging(args.log_file.as_deref())?;

  let file_cfg = load_config_file(args.config.as_deref())?;
  let settings = resolve(&args, file_cfg)?;

  let client = ApiClient::new(ApiConfig { base_url: settings.base_url })?;
  let sink = match settings.relay {
    None => ConfiguredSink::Api(ApiSink::new(client.clone())),
    Some(relay) => ConfiguredSink::EmailRelay(EmailRelaySink::new(relay)?),
  };
  tracing::info!("delivering submissions to {}", sink.describe());

  let (tx, mut rx) = mpsc::unbounded_channel();
  let mut app = App::new(client, Arc::new(sink), tx);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<K: Sink>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<K>,
  events: &mut UnboundedReceiver<FormEvent>,
) -> Result<()> {
  loop {
    // Apply finished sends and expired banners before drawing.
    while let Ok(event) = events.try_recv() {
      app.handle_form_event(event);
    }

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
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn file(src: &str) -> ConfigFile { toml::from_str(src).unwrap() }

  #[test]
  fn defaults_to_local_api() {
    let settings = resolve(&Args::default(), ConfigFile::default()).unwrap();
    assert_eq!(settings, Settings { base_url: DEFAULT_URL.into(), relay: None });
  }

  #[test]
  fn flags_override_file() {
    let args = Args {
      url: Some("http://flag:1".into()),
      sink: Some(SinkKind::Api),
      ..Args::default()
    };
    let cfg = file(
      "url = \"http://file:2\"\nsink = \"email_relay\"\n[email_relay]\nservice_id = \"s\"\n",
    );
    let settings = resolve(&args, cfg).unwrap();
    assert_eq!(settings.base_url, "http://flag:1");
    assert_eq!(settings.relay, None);
  }

  #[test]
  fn email_relay_from_file() {
    let cfg = file(
      r#"
url  = "http://file:2"
sink = "email_relay"

[email_relay]
service_id  = "service_x"
template_id = "template_y"
public_key  = "pk_z"
"#,
    );
    let relay = resolve(&Args::default(), cfg).unwrap().relay.unwrap();
    assert_eq!(relay.service_id, "service_x");
    assert_eq!(relay.public_key, "pk_z");
    assert_eq!(relay.endpoint, DEFAULT_RELAY_ENDPOINT);
  }

  #[test]
  fn email_relay_without_credentials_is_rejected() {
    let args = Args { sink: Some(SinkKind::EmailRelay), ..Args::default() };
    let cfg = file("[email_relay]\nservice_id = \"s\"\npublic_key = \"\"\n");
    let err = resolve(&args, cfg).unwrap_err().to_string();
    assert!(err.contains("template_id"), "{err}");
    assert!(err.contains("public_key"), "{err}");
    assert!(!err.contains("service_id"), "{err}");
  }

  #[test]
  fn sink_flag_parses_snake_case() {
    let args = Args::try_parse_from(["folio", "--sink", "email_relay"]).unwrap();
    assert_eq!(args.sink, Some(SinkKind::EmailRelay));
  }
}
