//! Terminal rendering of the style surface.
//!
//! Widgets never look at the preference set directly; they read the
//! projected attributes and properties, the same values a stylesheet would.

use std::str::FromStr;

use crossterm::cursor::SetCursorStyle;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::prefs::surface::{ATTR_CURSOR, ATTR_FONT, ATTR_RADIUS, PROP_ACCENT, PROP_MOTION_SCALE};
use crate::prefs::{CursorStyle, StyleSurface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub accent: Color,
    pub border_type: BorderType,
    /// Motion scale is non-zero.
    pub animated: bool,
    pub mono: bool,
    pub cursor_glyph: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Green,
            border_type: BorderType::Rounded,
            animated: true,
            mono: false,
            cursor_glyph: "█",
        }
    }
}

impl Theme {
    pub fn from_surface(surface: &StyleSurface) -> Self {
        let fallback = Theme::default();
        let accent = surface
            .property(PROP_ACCENT)
            .and_then(|hex| Color::from_str(hex).ok())
            .unwrap_or(fallback.accent);
        let border_type = match surface.attribute(ATTR_RADIUS) {
            Some("square") => BorderType::Plain,
            _ => BorderType::Rounded,
        };
        let cursor_glyph = match surface.attribute(ATTR_CURSOR) {
            Some("underline") => "_",
            Some("bar") => "▏",
            _ => "█",
        };
        Self {
            accent,
            border_type,
            animated: surface.property(PROP_MOTION_SCALE) != Some("0"),
            mono: surface.attribute(ATTR_FONT) == Some("mono"),
            cursor_glyph,
        }
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn heading_style(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().fg(Color::Black).bg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(self.border_type)
            .border_style(self.accent_style())
    }

    /// Whether a blinking element is lit on this tick. Always lit when motion
    /// is reduced.
    pub fn blink_on(&self, tick: u64) -> bool {
        !self.animated || (tick / 10) % 2 == 0
    }
}

/// Terminal cursor shape for a cursor preference.
pub fn cursor_command(style: CursorStyle) -> SetCursorStyle {
    match style {
        CursorStyle::Block => SetCursorStyle::SteadyBlock,
        CursorStyle::Underline => SetCursorStyle::SteadyUnderScore,
        CursorStyle::Bar => SetCursorStyle::SteadyBar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{AccentColor, BorderRadius, FontMode, PreferenceSet};

    #[test]
    fn theme_follows_surface() {
        let prefs = PreferenceSet {
            accent_color: AccentColor::Blue,
            border_radius: BorderRadius::Square,
            reduce_motion: true,
            font_mode: FontMode::Mono,
            cursor_style: CursorStyle::Bar,
            ..PreferenceSet::default()
        };
        let theme = Theme::from_surface(&StyleSurface::project(&prefs));
        assert_eq!(theme.accent, Color::Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(theme.border_type, BorderType::Plain);
        assert!(!theme.animated);
        assert!(theme.mono);
        assert_eq!(theme.cursor_glyph, "▏");
        assert!(theme.blink_on(15));
    }

    #[test]
    fn defaults_are_green_and_rounded() {
        let theme = Theme::from_surface(&StyleSurface::project(&PreferenceSet::default()));
        assert_eq!(theme.accent, Color::Rgb(0x00, 0xff, 0x41));
        assert_eq!(theme.border_type, BorderType::Rounded);
        assert!(theme.animated);
        assert!(!theme.blink_on(15));
    }
}
