use anyhow::{Result, anyhow};
use ratatui::widgets::TableState;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::player::BrowserPlayer;
use crate::theme::{self, THEMES};
use crate::youtube::{Extractor, VideoRecord, watch_url};

// --- Types ---

pub type SearchResult = Vec<VideoRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Input,
  Results,
}

pub struct App {
  pub input: String,
  pub cursor_position: usize,
  /// Horizontal scroll offset for the search input.
  pub input_scroll: usize,
  pub mode: AppMode,
  pub theme_index: usize,
  /// Results of the last successful search, in yt-dlp order.
  pub results: Vec<VideoRecord>,
  pub table_state: TableState,
  pub player: BrowserPlayer,
  pub extractor: Extractor,
  /// Error shown in the modal dialog until dismissed.
  pub last_error: Option<String>,
  /// Progress text, e.g. while a search is running.
  pub status_message: Option<String>,
  /// Informational message, lower priority than status.
  pub info_message: Option<String>,
  /// True while a search is in flight; the search control is disabled.
  pub searching: bool,
  pub should_quit: bool,
  search_rx: Option<oneshot::Receiver<Result<SearchResult>>>,
  config: Config,
  config_path: Option<PathBuf>,
}

impl App {
  /// Build the app with `initial_query` pre-filled in the input box.
  ///
  /// `config_path` is where theme changes are persisted; `None` disables saving.
  pub fn new(config: Config, config_path: Option<PathBuf>, extractor: Extractor, initial_query: String) -> Self {
    let theme_index = theme::theme_index(config.theme_name.as_deref());
    let cursor_position = initial_query.chars().count();

    Self {
      input: initial_query,
      cursor_position,
      input_scroll: 0,
      mode: AppMode::Input,
      theme_index,
      results: Vec::new(),
      table_state: TableState::default(),
      player: BrowserPlayer::default(),
      extractor,
      last_error: None,
      status_message: None,
      info_message: None,
      searching: false,
      should_quit: false,
      search_rx: None,
      config,
      config_path,
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is always bounded by modular arithmetic in next_theme()
    // and by theme::theme_index() on initialization.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.config.theme_name = Some(self.theme().name.to_string());
    self.save_config();
  }

  fn save_config(&self) {
    let Some(ref path) = self.config_path else { return };
    if let Err(e) = self.config.save_to(path) {
      warn!(err = %e, path = %path.display(), "config: failed to save preferences");
    }
  }

  /// Show `msg` in the error dialog.
  pub fn set_error(&mut self, msg: String) {
    warn!(err = %msg, "error dialog");
    self.last_error = Some(msg);
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
  }

  /// Start a search for the current input.
  ///
  /// An empty query raises an error without searching. Does nothing while a
  /// search is already running.
  pub fn trigger_search(&mut self) {
    if self.searching {
      return;
    }
    let query = self.input.trim().to_string();
    if query.is_empty() {
      self.set_error("Enter a search term.".to_string());
      return;
    }
    info!(query = %query, limit = self.extractor.limit, "search triggered");
    self.clear_error();
    self.info_message = None;
    self.status_message = Some(format!("Searching '{}'…", query));
    self.searching = true;

    let extractor = self.extractor.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(extractor.search(&query).await);
    });
    self.search_rx = Some(rx);
  }

  /// Apply the outcome of a search. The search control is re-enabled in every case.
  pub fn finish_search(&mut self, result: Result<SearchResult>) {
    self.status_message = None;
    self.searching = false;
    match result {
      Ok(results) if results.is_empty() => {
        info!("search returned no videos");
        self.set_error("No videos found.".to_string());
      }
      Ok(results) => {
        info!(count = results.len(), "search complete");
        self.results = results;
        self.table_state.select(Some(0));
        self.mode = AppMode::Results;
      }
      Err(e) => {
        let msg = format!("{:#}", e);
        error!(err = %msg, "search failed");
        self.set_error(format!("Search failed: {}", msg));
      }
    }
  }

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.search_rx.take() {
      match rx.try_recv() {
        Ok(result) => self.finish_search(result),
        Err(oneshot::error::TryRecvError::Empty) => {
          self.search_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.finish_search(Err(anyhow!("search task ended without a result")));
        }
      }
    }
  }

  pub fn select_next(&mut self) {
    let count = self.results.len();
    if count > 0 {
      let i = self.table_state.selected().map_or(0, |i| (i + 1) % count);
      self.table_state.select(Some(i));
    }
  }

  pub fn select_previous(&mut self) {
    let count = self.results.len();
    if count > 0 {
      let i = self.table_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.table_state.select(Some(i));
    }
  }

  /// Resolve the watch URL for a table row.
  pub fn watch_url_for_row(&self, row: usize) -> Result<String> {
    let record = self
      .results
      .get(row)
      .ok_or_else(|| anyhow!("Invalid row {} (have {} results)", row + 1, self.results.len()))?;
    let id = record.id.as_deref().ok_or_else(|| anyhow!("No video id for '{}'", record.title))?;
    Ok(watch_url(id))
  }

  /// Open the video in `row` in the browser. Failures go to the error dialog.
  pub fn play_row(&mut self, row: usize) {
    match self.open_row(row) {
      Ok(url) => {
        self.info_message = Some(format!("Opened {}", url));
      }
      Err(e) => {
        self.set_error(format!("Playback failed: {:#}", e));
      }
    }
  }

  fn open_row(&mut self, row: usize) -> Result<String> {
    let url = self.watch_url_for_row(row)?;
    info!(row = row + 1, url = %url, "play requested");
    self.player.play(&url)?;
    Ok(url)
  }

  pub fn play_selected(&mut self) {
    match self.table_state.selected() {
      Some(row) => self.play_row(row),
      None => self.set_error("Select a video first.".to_string()),
    }
  }
}
