//! Display strings for the results table and input box.

use unicode_width::UnicodeWidthChar;

pub const UNKNOWN: &str = "unknown";

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` display columns, appending "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
  let full: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
  if full <= max_width {
    return s.to_string();
  }
  let budget = max_width.saturating_sub(1);
  let mut used = 0;
  let mut truncated = String::new();
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > budget {
      break;
    }
    used += w;
    truncated.push(c);
  }
  format!("{}…", truncated)
}

/// `H:MM:SS` for an hour or longer, `M:SS` otherwise.
///
/// A missing, zero, negative or non-finite duration is shown as "unknown"
/// (live streams and some shorts come back without a usable length).
pub fn format_duration(secs: Option<f64>) -> String {
  let Some(secs) = secs.filter(|s| s.is_finite() && *s >= 1.0) else {
    return UNKNOWN.to_string();
  };
  let total = secs.round() as u64;
  let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
  if h > 0 { format!("{}:{:02}:{:02}", h, m, s) } else { format!("{}:{:02}", m, s) }
}

/// Insert `,` thousands separators into an integer.
pub fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

/// `"1,234 views"`, or "unknown" when the count is missing or zero.
pub fn format_views(views: Option<u64>) -> String {
  match views {
    Some(1) => "1 view".to_string(),
    Some(n) if n > 0 => format!("{} views", group_thousands(n)),
    _ => UNKNOWN.to_string(),
  }
}
