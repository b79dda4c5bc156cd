use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::theme::Theme;

pub const DASHBOARD_WIDTH: u16 = 36;
pub const DASHBOARD_HEIGHT: u16 = 10;

/// System dashboard in the top-right corner of `area`.
pub fn draw_dashboard(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let width = DASHBOARD_WIDTH.min(area.width);
    let height = DASHBOARD_HEIGHT.min(area.height);
    let panel = Rect::new(area.x + area.width - width, area.y, width, height);
    f.render_widget(Clear, panel);

    let block = theme.block(" system ");
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let dash = &app.dashboard;
    f.render_widget(
        Gauge::default()
            .gauge_style(theme.accent_style())
            .percent(dash.cpu() as u16)
            .label(format!("cpu {}%", dash.cpu())),
        rows[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(theme.accent_style())
            .percent(dash.memory() as u16)
            .label(format!("mem {}%", dash.memory())),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("uptime  ", theme.muted_style()),
            Span::raw(dash.uptime_text(Local::now())),
        ])),
        rows[4],
    );
    f.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("latency ", theme.muted_style()),
                Span::raw(dash.latency().to_string()),
            ]),
            Line::from(Span::styled(app.config.probe_addr.clone(), theme.muted_style())),
        ]),
        rows[5],
    );
}
