use crate::app::App;
use crate::prefs::PrefKey;
use crate::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent};

/// Settings modal: one row per preference plus the reset button.
pub fn handle_settings_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.ui.set_mode(AppMode::Browse);
            app.sound.play_click();
        }
        KeyCode::Up | KeyCode::Char('k') => app.ui.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.ui.settings_next(),
        KeyCode::Left | KeyCode::Char('h') => step_selected(app, false),
        KeyCode::Right | KeyCode::Char('l') => step_selected(app, true),
        KeyCode::Enter | KeyCode::Char(' ') => match app.ui.settings_key() {
            Some(_) => step_selected(app, true),
            None => confirm_reset(app),
        },
        KeyCode::Char('r') => confirm_reset(app),
        _ => {}
    }
}

/// Arrow keys only step preference rows; on the reset row they do nothing.
fn step_selected(app: &mut App, forward: bool) {
    let Some(key) = app.ui.settings_key() else {
        return;
    };
    app.prefs.step(key, forward);
    if key == PrefKey::Muted {
        app.sound.prime();
    }
    app.sound.play_click();
}

fn confirm_reset(app: &mut App) {
    app.reset_preferences();
    app.sound.play_click();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::hotkeys::EASTER_EGG;
    use crate::prefs::{AccentColor, Broadcaster, MemoryStore, PreferenceStore};
    use crate::sound::testing::Recorder;
    use crate::sound::SoundManager;
    use crate::state::ui::SETTINGS_ROWS;
    use crate::state::AppConfig;
    use crossterm::event::{Event, KeyModifiers};
    use tokio::sync::mpsc;

    fn settings_app(store: &MemoryStore) -> App {
        let (tx, _rx) = mpsc::unbounded_channel::<AppEvent>();
        let prefs = Broadcaster::load(Box::new(store.clone())).shared();
        let sound = SoundManager::new(prefs.clone(), Recorder::default().factory());
        let mut app = App::new(AppConfig::default(), prefs, sound, tx);
        app.ui.set_mode(AppMode::Settings);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        app.handle_event(AppEvent::Terminal(event));
    }

    fn select_reset_row(app: &mut App) {
        app.prefs.set_accent_color(AccentColor::Purple);
        app.ui.settings_selected = SETTINGS_ROWS - 1;
        assert_eq!(app.ui.settings_key(), None);
    }

    #[tokio::test]
    async fn rows_step_their_preference() {
        let store = MemoryStore::new();
        let mut app = settings_app(&store);

        // Row 2 is the speed slider.
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.prefs.matrix_speed(), 6);
        assert_eq!(store.read("matrix_speed").as_deref(), Some("6"));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.prefs.matrix_speed(), 7);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.prefs.matrix_speed(), 6);

        // Up from the first row lands on reset.
        for _ in 0..3 {
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.ui.settings_selected, SETTINGS_ROWS - 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.prefs.matrix_speed(), 5);
        assert!(store.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, AppMode::Browse);
    }

    #[tokio::test]
    async fn arrows_on_reset_row_change_nothing() {
        let store = MemoryStore::new();
        let mut app = settings_app(&store);
        select_reset_row(&mut app);

        for code in [KeyCode::Right, KeyCode::Left, KeyCode::Char('l'), KeyCode::Char('h')] {
            press(&mut app, code);
            assert_eq!(app.prefs.accent_color(), AccentColor::Purple, "{code:?}");
            assert_eq!(store.read("accent_color").as_deref(), Some("purple"), "{code:?}");
        }
    }

    #[tokio::test]
    async fn confirming_keys_reset_from_reset_row() {
        for code in [KeyCode::Enter, KeyCode::Char(' ')] {
            let store = MemoryStore::new();
            let mut app = settings_app(&store);
            select_reset_row(&mut app);
            press(&mut app, code);
            assert_eq!(app.prefs.accent_color(), AccentColor::Green, "{code:?}");
            assert!(store.is_empty(), "{code:?}");
        }

        let store = MemoryStore::new();
        let mut app = settings_app(&store);
        app.prefs.set_accent_color(AccentColor::Purple);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.prefs.accent_color(), AccentColor::Green);
    }

    #[tokio::test]
    async fn secret_sequence_over_reset_row_keeps_preferences() {
        let store = MemoryStore::new();
        let mut app = settings_app(&store);
        select_reset_row(&mut app);

        for code in EASTER_EGG {
            press(&mut app, code);
        }
        assert!(app.prefs.matrix_active());
        assert_eq!(app.prefs.accent_color(), AccentColor::Purple);
        assert_eq!(store.read("accent_color").as_deref(), Some("purple"));
        app.shutdown();
    }
}
