//! The scrolling landing page. Line counts here must match
//! `content::section_height`, which the navbar uses to find sections.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::content::{self, Section};
use crate::prefs::FontMode;
use crate::ui::theme::Theme;

fn section_lines(section: Section, theme: &Theme, tick: u64) -> Vec<Line<'static>> {
    let font = if theme.mono { FontMode::Mono } else { FontMode::Sans };
    let mut lines: Vec<Line> = match section {
        Section::Hero => content::hero_heading(font)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, theme.heading_style())))
            .collect(),
        _ => vec![
            Line::from(Span::styled(format!("## {}", section.title()), theme.heading_style())),
            Line::from(Span::styled("─".repeat(section.title().len() + 3), theme.muted_style())),
        ],
    };

    let blurb = section.blurb();
    for (i, text) in blurb.iter().enumerate() {
        let mut spans = vec![Span::raw(*text)];
        if section == Section::Hero && i == 0 && theme.blink_on(tick) {
            spans.push(Span::styled(format!(" {}", theme.cursor_glyph), theme.accent_style()));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines
}

pub fn draw_page(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    app.ui.viewport = area;
    let max = app.max_scroll();
    if app.ui.scroll > max {
        app.ui.scroll = max;
    }

    let lines: Vec<Line> = Section::ALL
        .into_iter()
        .flat_map(|section| section_lines(section, theme, app.ui.tick_count))
        .collect();
    f.render_widget(Paragraph::new(lines).scroll((app.ui.scroll, 0)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{PreferenceSet, StyleSurface};

    #[test]
    fn rendered_lines_match_section_heights() {
        for font in [FontMode::Sans, FontMode::Mono] {
            let prefs = PreferenceSet { font_mode: font, ..PreferenceSet::default() };
            let theme = Theme::from_surface(&StyleSurface::project(&prefs));
            for section in Section::ALL {
                assert_eq!(
                    section_lines(section, &theme, 0).len() as u16,
                    content::section_height(section, font),
                    "{section:?} in {font:?}"
                );
            }
        }
    }
}
