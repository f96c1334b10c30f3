use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of output is, independent of how it is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Timestamp,
  Primary,
  Accent,
  Label,
  Value,
  Success,
  Error,
  Warning,
  Note,
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  pub const fn color(&self, role: Role) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    let (r, g, b) = Self::rgb(self.theme, role);
    Color::Rgb { r, g, b }
  }

  const fn rgb(theme: Theme, role: Role) -> (u8, u8, u8) {
    match (theme, role) {
      (Theme::Dark, Role::Timestamp | Role::Note) => (118, 166, 166),
      (Theme::Light, Role::Timestamp) => (92, 62, 38),
      (Theme::Dark, Role::Primary) => (191, 126, 4),
      (Theme::Light, Role::Primary) => (70, 42, 25),
      (Theme::Dark, Role::Accent) => (166, 84, 55),
      (Theme::Light, Role::Accent) => (211, 99, 70),
      (Theme::Dark, Role::Label) => (217, 164, 4),
      (Theme::Light, Role::Label) => (176, 103, 66),
      (Theme::Dark, Role::Value | Role::Warning) => (242, 211, 56),
      (Theme::Light, Role::Value) => (199, 146, 76),
      (Theme::Dark, Role::Success) => (118, 196, 140),
      (Theme::Light, Role::Success) => (34, 142, 90),
      (Theme::Dark, Role::Error) => (230, 96, 80),
      (Theme::Light, Role::Error) => (180, 40, 30),
      (Theme::Light, Role::Warning) => (160, 110, 0),
      (Theme::Light, Role::Note) => (40, 111, 170),
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.color(Role::Timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.color(Role::Primary)
  }

  pub const fn label(&self) -> Color {
    self.color(Role::Label)
  }

  pub const fn value(&self) -> Color {
    self.color(Role::Value)
  }

  pub const fn success(&self) -> Color {
    self.color(Role::Success)
  }

  /// The same color for table cells.
  pub const fn comfy(&self, role: Role) -> ComfyColor {
    match self.color(role) {
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      _ => ComfyColor::Reset,
    }
  }

  pub fn clap_styles() -> Styles {
    let colors = Self::new(true, Theme::Dark);
    let fg = |role: Role| {
      let (r, g, b) = Self::rgb(colors.theme, role);
      Some(ClapColor::Rgb(RgbColor(r, g, b)))
    };

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(fg(Role::Label)))
      .usage(Style::new().bold().fg_color(fg(Role::Label)))
      .literal(Style::new().fg_color(fg(Role::Success)))
      .placeholder(Style::new().fg_color(fg(Role::Note)))
      .error(Style::new().bold().fg_color(fg(Role::Error)))
      .valid(Style::new().fg_color(fg(Role::Success)))
      .invalid(Style::new().bold().fg_color(fg(Role::Accent)))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

/// `COLORFGBG` is `fg;bg`; background colors 8 and up are light.
fn detect_terminal_theme() -> Theme {
  if let Ok(colorfgbg) = std::env::var("COLORFGBG")
    && let Some(bg) = colorfgbg.split(';').next_back()
    && let Ok(bg_num) = bg.parse::<u8>()
  {
    return if bg_num >= 8 { Theme::Light } else { Theme::Dark };
  }
  Theme::Dark
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_disabled_colors_reset() {
    let colors = Colors::new(false, Theme::Dark);
    assert_eq!(colors.primary(), Color::Reset);
    assert!(matches!(colors.comfy(Role::Error), ComfyColor::Reset));
  }

  #[test]
  fn test_themes_differ() {
    let dark = Colors::new(true, Theme::Dark);
    let light = Colors::new(true, Theme::Light);
    assert_ne!(dark.label(), light.label());
  }
}
