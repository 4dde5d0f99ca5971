use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::constants::constants;

/// A single search result as shown in the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
  pub title: String,
  /// Length in seconds, if yt-dlp reported one.
  pub duration: Option<f64>,
  pub view_count: Option<u64>,
  /// Opaque video id used to build the watch URL.
  pub id: Option<String>,
}

/// Raw `entries[]` item from `yt-dlp -J --flat-playlist`. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
  title: Option<String>,
  duration: Option<f64>,
  view_count: Option<u64>,
  id: Option<String>,
}

/// Entries are kept as raw JSON so one malformed item can't sink the whole batch.
#[derive(Debug, Deserialize)]
struct SearchPlaylist {
  entries: Option<Vec<serde_json::Value>>,
}

impl From<RawEntry> for VideoRecord {
  fn from(raw: RawEntry) -> Self {
    let title = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).unwrap_or_else(|| "Unknown".into());
    let id = raw.id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Self { title, duration: raw.duration, view_count: raw.view_count, id }
  }
}

/// Build the browser URL for a video id.
pub fn watch_url(id: &str) -> String {
  format!("{}{}", constants().watch_url_base, id)
}

/// Parse the JSON document printed by `yt-dlp -J` for a `ytsearchN:` query.
///
/// A `null` document or missing `entries` is an empty result. Entries that
/// failed extraction come back as `null` (with `--ignore-errors`) and are dropped,
/// as are entries whose fields don't have the expected types.
pub fn parse_search_output(stdout: &str) -> Result<Vec<VideoRecord>> {
  let trimmed = stdout.trim();
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }
  let playlist: Option<SearchPlaylist> =
    serde_json::from_str(trimmed).context("yt-dlp printed malformed search JSON")?;
  let Some(playlist) = playlist else {
    return Ok(Vec::new());
  };
  let entries = playlist.entries.unwrap_or_default();
  let total = entries.len();
  let mut nulls = 0;
  let mut malformed = 0;
  let mut records = Vec::with_capacity(total);
  for entry in entries {
    if entry.is_null() {
      nulls += 1;
      continue;
    }
    match serde_json::from_value::<RawEntry>(entry) {
      Ok(raw) => records.push(VideoRecord::from(raw)),
      Err(e) => {
        debug!(err = %e, "search: dropped malformed entry");
        malformed += 1;
      }
    }
  }
  if nulls + malformed > 0 {
    debug!(nulls, malformed, kept = records.len(), "search: dropped entries");
  }
  Ok(records)
}

/// How to invoke yt-dlp and how many results to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
  pub program: String,
  pub limit: usize,
}

impl Extractor {
  pub fn new(program: impl Into<String>, limit: usize) -> Self {
    Self { program: program.into(), limit: limit.clamp(1, constants().max_result_limit) }
  }

  /// The pseudo-URL yt-dlp uses for a capped search, e.g. `ytsearch10:rust`.
  pub fn search_target(&self, query: &str) -> String {
    format!("ytsearch{}:{}", self.limit, query)
  }

  pub async fn search(&self, query: &str) -> Result<Vec<VideoRecord>> {
    let target = self.search_target(query);
    let output = Command::new(&self.program)
      .args(["-J", "--flat-playlist", "--ignore-errors", "--no-warnings", "--", &target])
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .output()
      .await
      .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
          anyhow!("{} not found. Install it with: brew install yt-dlp (macOS) or pip install yt-dlp", self.program)
        } else {
          anyhow!(e).context("Failed to execute yt-dlp search command")
        }
      })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if output.status.success() {
      let stdout_str = String::from_utf8(output.stdout).context("yt-dlp output non-UTF8")?;
      return parse_search_output(&stdout_str);
    }

    // With --ignore-errors yt-dlp still exits non-zero when any entry failed,
    // after printing the document with that entry as null. Keep the survivors.
    let partial = String::from_utf8(output.stdout).ok().and_then(|s| parse_search_output(&s).ok());
    match partial {
      Some(records) if !records.is_empty() => {
        warn!(
          status = %output.status,
          stderr = %stderr,
          kept = records.len(),
          "search: yt-dlp reported failed entries"
        );
        Ok(records)
      }
      _ => Err(anyhow!("yt-dlp search failed ({}): {}", output.status, stderr)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"{
    "_type": "playlist",
    "id": "rust tutorial",
    "entries": [
      {"_type": "url", "id": "abc123", "title": "Rust in 100 Seconds", "duration": 156.0, "view_count": 2345678},
      null,
      {"_type": "url", "id": "def456", "title": "Ownership explained", "duration": null, "view_count": null},
      null
    ]
  }"#;

  #[test]
  fn parse_drops_null_entries() {
    let records = parse_search_output(SAMPLE).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_deref(), Some("abc123"));
    assert_eq!(records[0].duration, Some(156.0));
    assert_eq!(records[0].view_count, Some(2_345_678));
    assert_eq!(records[1].title, "Ownership explained");
    assert_eq!(records[1].duration, None);
    assert_eq!(records[1].view_count, None);
  }

  #[test]
  fn parse_integer_duration() {
    let records = parse_search_output(r#"{"entries":[{"id":"x","title":"t","duration":61}]}"#).unwrap();
    assert_eq!(records[0].duration, Some(61.0));
  }

  #[test]
  fn parse_missing_title_and_id() {
    let records = parse_search_output(r#"{"entries":[{"title":"  ","id":""}]}"#).unwrap();
    assert_eq!(records[0].title, "Unknown");
    assert_eq!(records[0].id, None);
  }

  #[test]
  fn parse_null_document_and_missing_entries() {
    assert!(parse_search_output("null").unwrap().is_empty());
    assert!(parse_search_output("").unwrap().is_empty());
    assert!(parse_search_output(r#"{"_type":"playlist"}"#).unwrap().is_empty());
    assert!(parse_search_output(r#"{"entries":null}"#).unwrap().is_empty());
  }

  #[test]
  fn parse_drops_badly_typed_entries() {
    let stdout = r#"{"entries":[
      {"id":"good","title":"Fine","duration":60,"view_count":10},
      {"id":"bad","title":"Odd","view_count":"N/A"},
      {"id":42,"title":"Numeric id"},
      null
    ]}"#;
    let records = parse_search_output(stdout).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some("good"));
  }

  #[test]
  fn parse_malformed_json_is_error() {
    assert!(parse_search_output("{not json").is_err());
  }

  #[test]
  fn watch_url_format() {
    assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
  }

  #[test]
  fn search_target_uses_limit() {
    let extractor = Extractor::new("yt-dlp", 10);
    assert_eq!(extractor.search_target("rust async"), "ytsearch10:rust async");
  }

  #[test]
  fn extractor_limit_is_clamped() {
    assert_eq!(Extractor::new("yt-dlp", 0).limit, 1);
    assert_eq!(Extractor::new("yt-dlp", 10_000).limit, constants().max_result_limit);
  }

  #[tokio::test]
  async fn missing_program_reports_install_hint() {
    let extractor = Extractor::new("yts-test-no-such-binary", 5);
    let err = extractor.search("anything").await.unwrap_err();
    assert!(format!("{:#}", err).contains("not found"));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failing_program_is_error() {
    let extractor = Extractor::new("false", 5);
    let err = extractor.search("anything").await.unwrap_err();
    assert!(format!("{:#}", err).contains("yt-dlp search failed"));
  }

  /// Write an executable stand-in for yt-dlp into `dir`.
  #[cfg(unix)]
  fn fake_yt_dlp(dir: &std::path::Path, stdout: &str, stderr: &str, code: i32) -> String {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-yt-dlp");
    let script = format!("#!/bin/sh\ncat <<'EOF'\n{}\nEOF\necho '{}' >&2\nexit {}\n", stdout, stderr, code);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failed_entries_keep_surviving_records() {
    let dir = tempfile::tempdir().unwrap();
    let program = fake_yt_dlp(
      dir.path(),
      r#"{"entries":[{"id":"abc","title":"ok"},null]}"#,
      "ERROR: [youtube] xyz: Video unavailable",
      1,
    );
    let records = Extractor::new(program, 10).search("q").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some("abc"));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failed_run_with_only_nulls_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let program = fake_yt_dlp(dir.path(), r#"{"entries":[null,null]}"#, "ERROR: network down", 1);
    let err = Extractor::new(program, 10).search("q").await.unwrap_err();
    assert!(format!("{:#}", err).contains("network down"));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn silent_program_yields_no_results() {
    let extractor = Extractor::new("true", 5);
    assert!(extractor.search("anything").await.unwrap().is_empty());
  }
}
