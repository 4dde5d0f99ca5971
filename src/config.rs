use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User preferences persisted in `prefs.toml`.
///
/// Every field is optional so a hand-edited file with only some keys still loads.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub result_limit: Option<usize>,
  pub yt_dlp_program: Option<String>,
  pub initial_query: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "yts")
}

/// Path of `prefs.toml` in the platform config directory.
pub fn config_path() -> Option<PathBuf> {
  project_dirs().map(|dirs| dirs.config_dir().join("prefs.toml"))
}

/// Directory the log file is written to.
pub fn log_dir() -> Option<PathBuf> {
  project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
}

impl Config {
  pub fn load() -> Self {
    config_path().map(|path| Self::load_from(&path)).unwrap_or_default()
  }

  /// Read preferences from `path`, falling back to defaults if the file is missing or malformed.
  pub fn load_from(path: &Path) -> Self {
    if let Ok(content) = std::fs::read_to_string(path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }
    Self::default()
  }

  pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, toml::to_string(self)?)?;
    Ok(())
  }
}
