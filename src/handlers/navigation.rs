use crate::app::App;
use crate::content::Section;
use crate::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent};

/// Page browsing: section jumps, scrolling, dashboard toggle.
pub fn handle_browse_input(key: KeyEvent, app: &mut App) {
    let page = app.config.scroll_lines_per_page as i32;
    match key.code {
        KeyCode::Char('q') => app.ui.quit(),
        KeyCode::Tab => {
            app.step_section(1);
            app.sound.play_click();
        }
        KeyCode::BackTab => {
            app.step_section(-1);
            app.sound.play_click();
        }
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            if let Some(section) = Section::ALL.get(index).copied() {
                app.scroll_to(section);
                app.sound.play_click();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_by(page),
        KeyCode::PageUp => app.scroll_by(-page),
        KeyCode::Home => app.scroll_to(Section::Hero),
        KeyCode::End => app.scroll_by(i32::from(u16::MAX)),
        KeyCode::Char('d') => {
            app.prefs.toggle_dashboard();
            app.sound.play_click();
        }
        KeyCode::Esc if app.prefs.dashboard_open() => {
            app.prefs.set_dashboard_open(false);
        }
        _ => {}
    }
}

/// Any confirming key leaves the not-found panel for the top of the page.
pub fn handle_not_found_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('h') => {
            app.ui.set_mode(AppMode::Browse);
            app.scroll_to(Section::Hero);
            app.sound.play_click();
        }
        KeyCode::Char('q') => app.ui.quit(),
        _ => {}
    }
}
