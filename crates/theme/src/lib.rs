pub mod colors;

pub use colors::Color;

use dash_config::ThemeConfig;
use ratatui::style::{Modifier, Style};

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings. Calling [`Theme::from_config`]
/// is infallible — invalid color strings fall back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub foreground: Color,
    pub accent:     Color,
    pub muted:      Color,
    pub points:     Color,
    pub trend:      Color,
    /// `false` → no colours, only bold/plain text.
    pub color:      bool,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    ///
    /// A non-empty `NO_COLOR` environment variable disables colour regardless
    /// of the config.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::build(cfg, cfg.color && !no_color)
    }

    /// Theme without colours, for tests and monochrome terminals.
    pub fn plain(cfg: &ThemeConfig) -> Self {
        Self::build(cfg, false)
    }

    fn build(cfg: &ThemeConfig, color: bool) -> Self {
        Self {
            foreground: Color::from_hex(&cfg.foreground).unwrap_or(Color::WHITE),
            accent:     Color::from_hex(&cfg.accent).unwrap_or(Color::PURPLE),
            muted:      Color::from_hex(&cfg.muted).unwrap_or(Color::GREY),
            points:     Color::from_hex(&cfg.points).unwrap_or(Color::VIOLET),
            trend:      Color::from_hex(&cfg.trend).unwrap_or(Color::YELLOW),
            color,
        }
    }

    /// Foreground `color`, or no style at all when colour is off.
    pub fn fg(&self, color: Color) -> Style {
        if self.color {
            Style::default().fg(color.into())
        } else {
            Style::default()
        }
    }

    /// Body text.
    pub fn text(&self) -> Style {
        self.fg(self.foreground)
    }

    /// Block titles and table headers.
    pub fn heading(&self) -> Style {
        self.fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Secondary text: captions, axes, borders, placeholders.
    pub fn caption(&self) -> Style {
        self.fg(self.muted)
    }

    /// The headline number of a value box.
    pub fn value(&self) -> Style {
        self.fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_colors_fall_back() {
        let cfg = ThemeConfig {
            accent: "purple".into(),
            ..ThemeConfig::default()
        };
        let theme = Theme::plain(&cfg);
        assert_eq!(theme.accent, Color::PURPLE);
    }

    #[test]
    fn plain_theme_keeps_only_modifiers() {
        let theme = Theme::plain(&ThemeConfig::default());
        assert_eq!(theme.heading(), Style::default().add_modifier(Modifier::BOLD));
        assert_eq!(theme.caption(), Style::default());
        assert_eq!(theme.fg(Color::YELLOW), Style::default());
    }

    #[test]
    fn coloured_theme_uses_truecolor() {
        let theme = Theme::build(&ThemeConfig::default(), true);
        assert_eq!(theme.heading().fg, Some(ratatui::style::Color::Rgb(0x80, 0x00, 0x80)));
        assert_eq!(theme.caption().fg, Some(ratatui::style::Color::Rgb(0xa6, 0xad, 0xc8)));
    }
}
