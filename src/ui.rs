use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Cell, Clear, Padding, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, AppMode};
use crate::constants::constants;
use crate::format::{display_width, format_duration, format_views, truncate_str};
use crate::theme::Theme;

/// Width of the search button next to the input box.
const BUTTON_WIDTH: u16 = 13;

// --- Helpers ---

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect { x: area.x + (area.width - width) / 2, y: area.y + (area.height - height) / 2, width, height }
}

fn rounded_block(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  if app.results.is_empty() {
    render_welcome(frame, app, main_area);
  } else {
    render_results(frame, app, main_area);
  }
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);

  if let Some(err) = &app.last_error {
    render_error_dialog(frame, theme, err, frame.area());
  }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ yts ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_welcome(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let hint = if app.searching { "Fetching results…" } else { "Type a query below and press Enter." };
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("▶  YouTube search", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Find a video. Open it in your browser.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled(hint, Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(rounded_block(theme));
  frame.render_widget(paragraph, area);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let c = constants();

  // Title column gets what's left after borders, highlight symbol, fixed columns and spacing.
  let fixed = c.duration_col_width + c.views_col_width + c.action_col_width + 3;
  let title_w = area.width.saturating_sub(2 + 2 + fixed) as usize;

  let rows: Vec<Row> = app
    .results
    .iter()
    .enumerate()
    .map(|(i, record)| {
      let bg = if i % 2 == 1 { theme.stripe_bg } else { theme.bg };
      Row::new(vec![
        Cell::from(truncate_str(&record.title, title_w)),
        Cell::from(Line::from(format_duration(record.duration)).alignment(Alignment::Right)),
        Cell::from(Line::from(format_views(record.view_count)).alignment(Alignment::Right)),
        Cell::from(Span::styled("▶ Play", Style::default().fg(theme.accent))),
      ])
      .style(Style::default().fg(theme.fg).bg(bg))
    })
    .collect();

  let header = Row::new(vec![
    Cell::from("Title"),
    Cell::from(Line::from("Duration").alignment(Alignment::Right)),
    Cell::from(Line::from("Views").alignment(Alignment::Right)),
    Cell::from("Action"),
  ])
  .style(Style::default().fg(theme.muted).add_modifier(Modifier::BOLD))
  .bottom_margin(1);

  let border_color = if app.mode == AppMode::Results { theme.accent } else { theme.border };
  let table = Table::new(
    rows,
    [
      Constraint::Min(10),
      Constraint::Length(c.duration_col_width),
      Constraint::Length(c.views_col_width),
      Constraint::Length(c.action_col_width),
    ],
  )
  .header(header)
  .block(
    rounded_block(theme)
      .title(format!(" Results ({}) ", app.results.len()))
      .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
      .border_style(Style::default().fg(border_color)),
  )
  .highlight_symbol("▶ ")
  .row_highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(msg) = &app.info_message {
    (format!(" ℹ  {}", msg), Style::default().fg(theme.fg))
  } else if !app.results.is_empty() {
    (format!(" {} results", app.results.len()), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let [field_area, button_area] = Layout::horizontal([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)]).areas(area);

  let border_color = if app.mode == AppMode::Input { theme.accent } else { theme.border };
  let input_block = rounded_block(theme)
    .title(" Search YouTube ")
    .title_style(Style::default().fg(border_color))
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = field_area.width.saturating_sub(4).max(1) as usize;
  let cursor_col = display_width(&app.input, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, field_area);

  let (label, label_style, button_border) = if app.searching {
    ("Searching", Style::default().fg(theme.muted), theme.border)
  } else {
    ("Search", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD), theme.accent)
  };
  let button = Paragraph::new(Span::styled(label, label_style))
    .alignment(Alignment::Center)
    .block(rounded_block(theme).border_style(Style::default().fg(button_border)));
  frame.render_widget(button, button_area);

  if app.mode == AppMode::Input && app.last_error.is_none() {
    let cursor_x = field_area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, field_area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = if app.last_error.is_some() {
    vec![("Enter", "Dismiss"), ("^c", "Quit")]
  } else {
    match app.mode {
      AppMode::Input => {
        let mut k = vec![("Enter", "Search"), ("^t", "Theme")];
        if app.results.is_empty() {
          k.push(("Esc", "Quit"));
        } else {
          k.push(("↓", "Results"));
        }
        k
      }
      AppMode::Results => vec![("Enter", "Play"), ("j/k", "Navigate"), ("^t", "Theme"), ("Esc", "Search"), ("q", "Quit")],
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

/// Rows `line` occupies when word-wrapped to `width` columns.
///
/// Greedy wrap on spaces; words wider than `width` are split. Errs toward
/// counting one row too many rather than too few.
pub fn wrapped_rows(line: &str, width: usize) -> usize {
  let width = width.max(1);
  let mut rows = 1;
  let mut col = 0;
  for word in line.split(' ') {
    let w = display_width(word, word.chars().count());
    let needed = if col == 0 { w } else { col + 1 + w };
    if needed <= width {
      col = needed;
    } else if w <= width {
      rows += 1;
      col = w;
    } else {
      // Hard-split an over-long word, starting on a fresh row if this one is in use.
      if col > 0 {
        rows += 1;
      }
      rows += (w - 1) / width;
      col = w % width;
      if col == 0 {
        col = width;
      }
    }
  }
  rows
}

fn render_error_dialog(frame: &mut Frame, theme: &Theme, message: &str, area: Rect) {
  let width = 60.min(area.width.saturating_sub(4)).max(20);
  let text_w = width.saturating_sub(4).max(1) as usize;
  let text_rows: usize = message.lines().map(|l| wrapped_rows(l, text_w)).sum::<usize>().max(1);
  // Borders, blank spacer and the dismiss hint.
  let dialog = centered_rect(area, width, (text_rows + 4).min(u16::MAX as usize) as u16);

  let mut lines: Vec<Line> =
    message.lines().map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.fg)))).collect();
  lines.push(Line::from(""));
  lines.push(
    Line::from(Span::styled("Press Enter to dismiss", Style::default().fg(theme.muted))).alignment(Alignment::Center),
  );
  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
    Block::bordered()
      .title(" Error ")
      .title_style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(theme.error))
      .style(Style::default().bg(theme.bg))
      .padding(Padding::horizontal(1)),
  );
  frame.render_widget(Clear, dialog);
  frame.render_widget(paragraph, dialog);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::tests::{record, test_app};
  use crate::youtube::VideoRecord;
  use ratatui::{Terminal, backend::TestBackend};

  fn render(app: &mut App) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
    terminal.draw(|frame| ui(frame, app)).unwrap();
    let buf = terminal.backend().buffer();
    (0..buf.area.height).map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect::<String>()).collect()
  }

  fn count_rows(lines: &[String]) -> usize {
    lines.iter().filter(|l| l.contains("▶ Play")).count()
  }

  #[test]
  fn centered_rect_fits_and_centers() {
    let area = Rect::new(0, 0, 100, 20);
    assert_eq!(centered_rect(area, 40, 10), Rect::new(30, 5, 40, 10));
    assert_eq!(centered_rect(area, 200, 50), area);
  }

  #[test]
  fn table_has_one_row_per_result() {
    let mut app = test_app();
    app.finish_search(Ok(vec![record("First video", Some("1")), record("Second video", Some("2")), record("Third", Some("3"))]));
    let lines = render(&mut app);
    assert_eq!(count_rows(&lines), 3);
    assert!(lines.iter().any(|l| l.contains("Second video")));
    assert!(lines.iter().any(|l| l.contains("Duration") && l.contains("Views") && l.contains("Action")));
    assert!(lines.iter().any(|l| l.contains("1:30") && l.contains("1,500 views")));
  }

  #[test]
  fn missing_metadata_renders_unknown() {
    let mut app = test_app();
    app.finish_search(Ok(vec![VideoRecord { title: "Live now".to_string(), duration: None, view_count: None, id: None }]));
    let lines = render(&mut app);
    let row = lines.iter().find(|l| l.contains("Live now")).unwrap();
    assert_eq!(row.matches("unknown").count(), 2);
  }

  #[test]
  fn empty_results_show_welcome() {
    let mut app = test_app();
    let lines = render(&mut app);
    assert_eq!(count_rows(&lines), 0);
    assert!(lines.iter().any(|l| l.contains("YouTube search")));
  }

  #[test]
  fn error_dialog_is_drawn() {
    let mut app = test_app();
    app.set_error("Search failed: boom".to_string());
    let lines = render(&mut app);
    assert!(lines.iter().any(|l| l.contains(" Error ")));
    assert!(lines.iter().any(|l| l.contains("Search failed: boom")));
  }

  #[test]
  fn wrapped_rows_counts_word_wrap() {
    assert_eq!(wrapped_rows("", 10), 1);
    assert_eq!(wrapped_rows("short", 10), 1);
    assert_eq!(wrapped_rows("aaaa bbbb cccc", 10), 2);
    assert_eq!(wrapped_rows("aaaaaaaaaaaaaaaaaaaaaaaaa", 10), 3);
    assert_eq!(wrapped_rows("ab aaaaaaaaaaaaaaaaaaaa", 10), 3);
  }

  #[test]
  fn multiline_error_keeps_dismiss_hint_visible() {
    let mut app = test_app();
    app.set_error(
      "Search failed: yt-dlp search failed (exit status: 1): ERROR: [youtube] abc: Video unavailable\n\
       ERROR: [youtube] def: Sign in to confirm your age. This video may be inappropriate for some users.\n\
       ERROR: unable to download webpage"
        .to_string(),
    );
    let lines = render(&mut app);
    assert!(lines.iter().any(|l| l.contains("Press Enter to dismiss")));
    assert!(lines.iter().any(|l| l.contains("unable to download webpage")));
    assert!(lines.iter().any(|l| l.contains("│ ERROR: [youtube] def")));
  }

  #[test]
  fn button_shows_disabled_while_searching() {
    let mut app = test_app();
    app.searching = true;
    let lines = render(&mut app);
    assert!(lines.iter().any(|l| l.contains("Searching")));
  }
}
