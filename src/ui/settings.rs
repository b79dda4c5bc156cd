use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::prefs::{PrefKey, MATRIX_SPEED_MAX, MATRIX_SPEED_MIN};
use crate::ui::popups::draw_centered_rect;
use crate::ui::theme::Theme;

const SLIDER_WIDTH: usize = 20;

fn speed_slider(speed: u8) -> String {
    let span = (MATRIX_SPEED_MAX - MATRIX_SPEED_MIN) as usize;
    let filled = (speed.saturating_sub(MATRIX_SPEED_MIN) as usize * SLIDER_WIDTH) / span;
    format!("{}{} {speed}", "█".repeat(filled), "░".repeat(SLIDER_WIDTH - filled))
}

pub fn draw_settings(f: &mut Frame, app: &App, theme: &Theme) {
    let area = draw_centered_rect(f.area(), 60, 70);
    f.render_widget(Clear, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let prefs = app.prefs.prefs();
    let mut items: Vec<ListItem> = PrefKey::ALL
        .into_iter()
        .map(|key| {
            let value = match key {
                PrefKey::MatrixSpeed => speed_slider(prefs.matrix_speed),
                _ => prefs.display_value(key),
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<16}", key.label())),
                Span::styled(format!("‹ {value} ›"), theme.accent_style()),
            ]))
        })
        .collect();
    items.push(ListItem::new(Line::from(Span::styled("Reset to defaults", theme.heading_style()))));

    let mut state = ListState::default();
    state.select(Some(app.ui.settings_selected));
    let list = List::new(items)
        .block(theme.block(" settings "))
        .highlight_style(theme.selected_style())
        .highlight_symbol("› ");
    f.render_stateful_widget(list, chunks[0], &mut state);

    f.render_widget(
        Paragraph::new(Span::styled(
            "[↑↓] select  [←→] change  [Enter] apply  [Esc] close",
            theme.muted_style(),
        )),
        chunks[1],
    );
}
