use anyhow::{Context, Result, anyhow};
use std::process::{Command, Stdio};
use tracing::info;

/// Function used to hand a URL to the desktop.
pub type OpenFn = fn(&str) -> Result<()>;

#[cfg(target_os = "macos")]
const OPENER_CMD: &str = "open";
#[cfg(target_os = "macos")]
const OPENER_ARGS: &[&str] = &[];

#[cfg(target_os = "windows")]
const OPENER_CMD: &str = "cmd";
#[cfg(target_os = "windows")]
const OPENER_ARGS: &[&str] = &["/C", "start", ""];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER_CMD: &str = "xdg-open";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER_ARGS: &[&str] = &[];

/// Open `url` in the system default browser.
pub fn open_in_browser(url: &str) -> Result<()> {
  let mut child = Command::new(OPENER_CMD)
    .args(OPENER_ARGS)
    .arg(url)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("{} not found; cannot open a browser on this system", OPENER_CMD)
      } else {
        anyhow!(e)
      }
    })
    .with_context(|| format!("Failed to open browser for {}", url))?;
  // Reap the child in a background thread to avoid zombie processes.
  std::thread::spawn(move || {
    let _ = child.wait();
  });
  Ok(())
}

/// "Plays" a video by opening its watch page in the browser.
pub struct BrowserPlayer {
  open: OpenFn,
  /// URL of the most recently opened video.
  pub last_opened: Option<String>,
}

impl Default for BrowserPlayer {
  fn default() -> Self {
    Self::new(open_in_browser)
  }
}

impl BrowserPlayer {
  pub fn new(open: OpenFn) -> Self {
    Self { open, last_opened: None }
  }

  pub fn play(&mut self, url: &str) -> Result<()> {
    (self.open)(url)?;
    info!(url = %url, "opened video in browser");
    self.last_opened = Some(url.to_string());
    Ok(())
  }
}
