pub mod navigation;
pub mod palette;
pub mod settings;

use crate::app::App;
use crate::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Main input handler dispatcher
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // Windows reports releases too; only presses count.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.ui.quit();
        return;
    }

    // The hotkey router sees every key before anything else.
    let text_focus = app.prefs.palette_open();
    let outcome = app.hotkeys.handle(key, text_focus, &app.prefs);
    if let Some(action) = outcome.action {
        app.on_hotkey(action);
    }
    if outcome.consumed {
        return;
    }

    if app.prefs.palette_open() {
        palette::handle_palette_input(key, app);
        return;
    }

    match app.ui.mode {
        AppMode::Settings => settings::handle_settings_input(key, app),
        AppMode::NotFound(_) => navigation::handle_not_found_input(key, app),
        AppMode::Browse => navigation::handle_browse_input(key, app),
    }
}
