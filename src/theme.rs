use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: &[Theme] = &[
  Theme {
    name: "Midnight",
    bg: Color::Rgb(22, 24, 33),
    fg: Color::Rgb(214, 219, 229),
    accent: Color::Rgb(255, 85, 85),
    muted: Color::Rgb(110, 118, 138),
    border: Color::Rgb(58, 63, 82),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(70, 40, 48),
    stripe_bg: Color::Rgb(28, 30, 41),
    status: Color::Rgb(241, 196, 106),
    error: Color::Rgb(255, 110, 110),
    key_fg: Color::Rgb(22, 24, 33),
    key_bg: Color::Rgb(150, 158, 178),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 248, 242),
    fg: Color::Rgb(40, 40, 46),
    accent: Color::Rgb(196, 30, 58),
    muted: Color::Rgb(130, 128, 122),
    border: Color::Rgb(205, 200, 190),
    highlight_fg: Color::Rgb(20, 20, 24),
    highlight_bg: Color::Rgb(242, 214, 214),
    stripe_bg: Color::Rgb(243, 240, 232),
    status: Color::Rgb(176, 120, 20),
    error: Color::Rgb(190, 30, 30),
    key_fg: Color::Rgb(250, 248, 242),
    key_bg: Color::Rgb(100, 98, 92),
  },
  Theme {
    name: "Terminal",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::Red,
    muted: Color::DarkGray,
    border: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::Red,
    stripe_bg: Color::Reset,
    status: Color::Yellow,
    error: Color::LightRed,
    key_fg: Color::Black,
    key_bg: Color::Gray,
  },
];

/// Index of the theme called `name`, or the first theme.
pub fn theme_index(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(n))).unwrap_or(0)
}
