use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::content::{self, Section};
use crate::ui::theme::Theme;

/// Height of the navbar for the current scroll state.
pub fn navbar_height(app: &App) -> u16 {
    if app.navbar.is_compact() { 2 } else { 3 }
}

pub fn draw_navbar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let active = app.navbar.active();
    let mut spans = vec![Span::styled(content::OWNER, theme.heading_style()), Span::raw("  ")];
    for (n, section) in Section::ALL.into_iter().enumerate() {
        let label = format!(" {} {} ", n + 1, section.title());
        let style = if section == active {
            theme.selected_style()
        } else {
            theme.muted_style()
        };
        spans.push(Span::styled(label, style));
    }

    let snap = app.prefs.snapshot();
    let sound = if snap.prefs.muted { "♪ off" } else { "♪ on" };
    let matrix = if snap.prefs.matrix_active { " ▚ matrix" } else { "" };
    spans.push(Span::raw("   "));
    spans.push(Span::styled(sound, theme.accent_style()));
    spans.push(Span::styled(matrix, theme.accent_style().add_modifier(Modifier::BOLD)));

    let block = if app.navbar.is_compact() {
        theme.block("").borders(Borders::BOTTOM)
    } else {
        theme.block("")
    };
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
