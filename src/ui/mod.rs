//! Main UI module. Re-exports submodules and provides the main entry point.

pub mod backgrounds;
pub mod dashboard;
pub mod navbar;
pub mod page;
pub mod palette;
pub mod popups;
pub mod settings;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout},
    text::Span,
    widgets::{Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::state::AppMode;
use crate::ui::backgrounds::MatrixRainWidget;
use crate::ui::dashboard::draw_dashboard;
use crate::ui::navbar::{draw_navbar, navbar_height};
use crate::ui::page::draw_page;
use crate::ui::palette::draw_command_palette;
use crate::ui::popups::{draw_not_found, draw_notification_popup};
use crate::ui::settings::draw_settings;
use crate::ui::theme::Theme;

pub fn ui(f: &mut Frame, app: &mut App) {
    let snap = app.prefs.snapshot();
    let theme = Theme::from_surface(&snap.surface);
    let size = f.area();

    let chunks = Layout::default()
        .constraints([
            Constraint::Length(navbar_height(app)), // Navbar
            Constraint::Min(0),                     // Page
            Constraint::Length(2),                  // Footer
        ])
        .split(size);

    // Rain sits under the page text.
    app.rain_area = chunks[1];
    if snap.prefs.matrix_active {
        f.render_widget(MatrixRainWidget::new(&app.matrix, theme.accent), chunks[1]);
    }

    draw_navbar(f, app, chunks[0], &theme);
    draw_page(f, app, chunks[1], &theme);

    let help_text = match app.ui.mode {
        AppMode::Settings => "[↑↓] Select | [←→] Change | [Esc] Close",
        _ => "[Ctrl+K] Commands | [Shift+S] Settings | [Tab]/[1-8] Sections | [d] Dashboard | [q] Quit",
    };
    f.render_widget(
        Paragraph::new(Span::styled(help_text, theme.muted_style()))
            .alignment(Alignment::Center)
            .block(theme.block("").borders(Borders::TOP)),
        chunks[2],
    );

    if snap.dashboard_open {
        draw_dashboard(f, app, chunks[1], &theme);
    }

    match &app.ui.mode {
        AppMode::Settings => draw_settings(f, app, &theme),
        AppMode::NotFound(id) => draw_not_found(f, id, &theme),
        AppMode::Browse => {}
    }

    if snap.palette_open {
        draw_command_palette(f, app, &theme);
    }

    draw_notification_popup(f, app, &theme);
}
