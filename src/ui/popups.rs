//! Popups: notification toast and the not-found panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::theme::Theme;

pub fn draw_centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2), Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2), Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ]).split(popup_layout[1])[1]
}

/// Small toast in the bottom-right corner.
pub fn draw_notification_popup(f: &mut Frame, app: &App, theme: &Theme) {
    let Some(message) = app.notifications.message() else {
        return;
    };
    let area = f.area();
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height + 2),
        width,
        height,
    );
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(Span::styled(message, theme.accent_style()))
            .alignment(Alignment::Center)
            .block(theme.block("")),
        popup,
    );
}

pub fn draw_not_found(f: &mut Frame, id: &str, theme: &Theme) {
    let area = draw_centered_rect(f.area(), 60, 40);
    let text = vec![
        Line::from(Span::styled("404", theme.heading_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw("No section named "),
            Span::styled(format!("\"{id}\""), theme.accent_style()),
            Span::raw("."),
        ]),
        Line::from(""),
        Line::from(Span::styled("[Enter] back to the top   [q] quit", Style::default())),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(theme.block(" not found ")),
        area,
    );
}
