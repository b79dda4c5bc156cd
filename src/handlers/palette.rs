use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_palette_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.prefs.set_palette_open(false);
            app.sound.play_click();
        }
        KeyCode::Enter => {
            if let Some(action) = app.palette.selected_command().map(|c| c.action) {
                app.run_command(action);
            }
        }
        KeyCode::Down | KeyCode::Tab => app.palette.select_next(),
        KeyCode::Up | KeyCode::BackTab => app.palette.select_prev(),
        KeyCode::Backspace => {
            app.palette.pop_char();
            app.sound.play_keystroke();
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.palette.push_char(c);
            app.sound.play_keystroke();
        }
        _ => {}
    }
}
