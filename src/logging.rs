//! File logging. The terminal belongs to the UI, so diagnostics go to
//! `yts.log` in the platform data directory instead of stderr.

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config;

pub const LOG_FILE: &str = "yts.log";

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "YTS_LOG";

/// Build the filter from an explicit directive, else `YTS_LOG`, else `info`.
pub fn build_filter(directive: Option<&str>) -> Result<EnvFilter> {
  match directive {
    Some(d) => EnvFilter::try_new(d).with_context(|| format!("Invalid log filter '{}'", d)),
    None => Ok(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))),
  }
}

/// Install the global subscriber writing to `dir/yts.log`.
///
/// The returned guard flushes buffered lines on drop and must live until exit.
pub fn init_in(dir: &Path, directive: Option<&str>) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;
  let filter = build_filter(directive)?;
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;
  Ok(guard)
}

pub fn init(directive: Option<&str>) -> Result<WorkerGuard> {
  let dir = config::log_dir().context("No data directory available for the log file")?;
  init_in(&dir, directive)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn explicit_filter_is_parsed() {
    assert!(build_filter(Some("debug")).is_ok());
    assert!(build_filter(Some("yts=trace,warn")).is_ok());
  }

  #[test]
  fn invalid_filter_is_error() {
    let err = build_filter(Some("yts=notalevel")).unwrap_err();
    assert!(err.to_string().contains("Invalid log filter"));
  }
}
