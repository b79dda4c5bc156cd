use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::popups::draw_centered_rect;
use crate::ui::theme::Theme;

pub fn draw_command_palette(f: &mut Frame, app: &App, theme: &Theme) {
    let area = draw_centered_rect(f.area(), 60, 60);
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let query = Line::from(vec![
        Span::styled("> ", theme.accent_style()),
        Span::raw(app.palette.query()),
    ]);
    f.render_widget(Paragraph::new(query).block(theme.block(" command ")), chunks[0]);
    // The real terminal cursor, so the cursor-style preference shows here.
    let typed = app.palette.query().chars().count() as u16;
    let max_x = chunks[0].right().saturating_sub(2);
    f.set_cursor_position(((chunks[0].x + 3 + typed).min(max_x), chunks[0].y + 1));

    let items: Vec<ListItem> = app
        .palette
        .results()
        .map(|command| {
            let mut spans = vec![
                Span::styled(format!("{:<12}", command.category), theme.muted_style()),
                Span::raw(command.label.clone()),
            ];
            if let Some(shortcut) = command.shortcut {
                spans.push(Span::styled(format!("  [{shortcut}]"), theme.muted_style()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    if items.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No matching commands", theme.muted_style()))
                .block(theme.block("")),
            chunks[1],
        );
    } else {
        let mut state = ListState::default();
        state.select(Some(app.palette.selected_index()));
        let list = List::new(items)
            .block(theme.block(""))
            .highlight_style(theme.selected_style())
            .highlight_symbol("› ");
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{} commands  [↑↓] select  [Enter] run  [Esc] close", app.palette.result_count()),
            theme.muted_style(),
        )),
        chunks[2],
    );
}
