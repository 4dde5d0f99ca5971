mod app;
mod config;
mod constants;
mod format;
mod input;
mod logging;
mod player;
mod theme;
mod ui;
mod youtube;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;

use app::App;
use config::Config;
use constants::constants;
use youtube::Extractor;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Query searched at startup (default: saved preference, then "programming tutorial")
  #[arg(short, long)]
  query: Option<String>,

  /// Maximum number of results per search
  #[arg(short = 'n', long)]
  limit: Option<usize>,

  /// Name or path of the yt-dlp executable
  #[arg(long = "yt-dlp", value_name = "PROGRAM")]
  yt_dlp: Option<String>,

  /// Log filter such as "debug" or "yts=trace" (overrides YTS_LOG)
  #[arg(long, value_name = "FILTER")]
  log_level: Option<String>,

  /// Print shell completions to stdout and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<clap_complete::Shell>,
}

/// Merge CLI flags over saved preferences over built-in constants.
fn resolve_settings(args: &Args, config: &Config) -> (Extractor, String) {
  let c = constants();
  let program = args.yt_dlp.clone().or_else(|| config.yt_dlp_program.clone()).unwrap_or_else(|| c.yt_dlp_program.clone());
  let limit = args.limit.or(config.result_limit).unwrap_or(c.result_limit);
  let query = args.query.clone().or_else(|| config.initial_query.clone()).unwrap_or_else(|| c.default_query.clone());
  (Extractor::new(program, limit), query)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "yts", &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = match logging::init(args.log_level.as_deref()) {
    Ok(guard) => Some(guard),
    Err(e) => {
      eprintln!("warning: logging disabled: {:#}", e);
      None
    }
  };

  let config = Config::load();
  let (extractor, query) = resolve_settings(&args, &config);
  info!(version = env!("CARGO_PKG_VERSION"), program = %extractor.program, limit = extractor.limit, "starting");
  let app = App::new(config, config::config_path(), extractor, query);

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, app);
  ratatui::restore();
  info!("exiting");
  result
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  if !app.input.trim().is_empty() {
    app.trigger_search();
  }

  loop {
    app.check_pending();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_definition_is_valid() {
    Args::command().debug_assert();
  }

  #[test]
  fn defaults_come_from_constants() {
    let args = Args::parse_from(["yts"]);
    let (extractor, query) = resolve_settings(&args, &Config::default());
    assert_eq!(extractor.program, "yt-dlp");
    assert_eq!(extractor.limit, 10);
    assert_eq!(query, "programming tutorial");
  }

  #[test]
  fn config_overrides_constants() {
    let args = Args::parse_from(["yts"]);
    let config = Config {
      result_limit: Some(5),
      yt_dlp_program: Some("/usr/local/bin/yt-dlp".to_string()),
      initial_query: Some(String::new()),
      ..Config::default()
    };
    let (extractor, query) = resolve_settings(&args, &config);
    assert_eq!(extractor.program, "/usr/local/bin/yt-dlp");
    assert_eq!(extractor.limit, 5);
    assert_eq!(query, "");
  }

  #[test]
  fn cli_overrides_config() {
    let args = Args::parse_from(["yts", "-q", "rust async", "-n", "3", "--yt-dlp", "./yt-dlp"]);
    let config = Config { result_limit: Some(5), initial_query: Some("saved".to_string()), ..Config::default() };
    let (extractor, query) = resolve_settings(&args, &config);
    assert_eq!(extractor.program, "./yt-dlp");
    assert_eq!(extractor.limit, 3);
    assert_eq!(query, "rust async");
  }
}
