// src/app.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::content::{self, Section};
use crate::hotkeys::{HotkeyAction, HotkeyRouter};
use crate::prefs::{Broadcaster, Choice, CursorStyle, PrefKey, Snapshot};
use crate::sound::SoundManager;
use crate::state::palette::build_commands;
use crate::state::{
    AppConfig, AppMode, CommandAction, CommandPalette, Dashboard, MatrixRain, NavbarState,
    NotificationState, UiState,
};

/// Everything the main loop reacts to. Timer tasks only ever send these.
#[derive(Debug)]
pub enum AppEvent {
    Terminal(Event),
    Tick,
    /// Matrix rain frame from the timer with this generation.
    RainFrame(u64),
    DashboardRefresh(u64),
    Latency(Result<Duration, String>),
}

pub struct App {
    pub config: AppConfig,
    pub prefs: Arc<Broadcaster>,
    pub sound: SoundManager,
    pub hotkeys: HotkeyRouter,
    pub ui: UiState,
    pub navbar: NavbarState,
    pub palette: CommandPalette,
    pub matrix: MatrixRain,
    pub dashboard: Dashboard,
    pub notifications: NotificationState,
    /// Area the rain was last drawn into.
    pub rain_area: Rect,
    events: UnboundedSender<AppEvent>,
    updates: watch::Receiver<Snapshot>,
    /// Snapshot the consumers were last synced against.
    seen: Snapshot,
    cursor_change: Option<CursorStyle>,
}

impl App {
    pub fn new(
        config: AppConfig,
        prefs: Arc<Broadcaster>,
        sound: SoundManager,
        events: UnboundedSender<AppEvent>,
    ) -> App {
        let mut updates = prefs.subscribe();
        let seen = updates.borrow_and_update().clone();
        let mut app = App {
            hotkeys: HotkeyRouter::new(config.matrix_chord),
            config,
            cursor_change: Some(seen.prefs.cursor_style),
            seen,
            updates,
            prefs,
            sound,
            ui: UiState::default(),
            navbar: NavbarState::default(),
            palette: CommandPalette::new(),
            matrix: MatrixRain::new(),
            dashboard: Dashboard::default(),
            notifications: NotificationState::default(),
            rain_area: Rect::default(),
            events,
        };
        if let Some(id) = app.config.start_section.clone() {
            app.open_section_id(&id);
        }
        app
    }

    /// Jump to a section by id, or show the not-found panel.
    pub fn open_section_id(&mut self, id: &str) {
        match Section::from_id(id) {
            Some(section) => {
                self.ui.set_mode(AppMode::Browse);
                self.scroll_to(section);
            }
            None => {
                warn!(%id, "unknown section requested");
                self.ui.set_mode(AppMode::NotFound(id.to_string()));
            }
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Terminal(Event::Key(key)) => crate::handlers::handle_key_event(key, self),
            AppEvent::Terminal(_) => {}
            AppEvent::Tick => self.on_tick(),
            AppEvent::RainFrame(generation) => {
                self.matrix.on_frame(generation, self.rain_area.width, self.rain_area.height);
            }
            AppEvent::DashboardRefresh(generation) => {
                self.dashboard.on_refresh(generation, &mut rand::thread_rng());
            }
            AppEvent::Latency(result) => self.dashboard.on_latency(result),
        }
        self.sync_consumers();
    }

    /// Bring every consumer in line with the latest snapshot. Runs after each
    /// event, i.e. once per frame.
    pub fn sync_consumers(&mut self) {
        // The broadcaster outlives the app, so the sender is never closed.
        let changed = self.updates.has_changed().unwrap_or(false);
        let snap = self.updates.borrow_and_update().clone();

        if changed {
            if snap.palette_open && !self.seen.palette_open {
                self.palette.open(build_commands(&snap));
            } else if snap.palette_open {
                self.palette.refresh(build_commands(&snap));
            }
            if snap.prefs.cursor_style != self.seen.prefs.cursor_style {
                self.cursor_change = Some(snap.prefs.cursor_style);
            }
            if snap.prefs.font_mode != self.seen.prefs.font_mode {
                // Section heights change with the font.
                let max = self.max_scroll();
                self.ui.scroll = self.ui.scroll.min(max);
                self.navbar.on_scroll(self.ui.scroll, snap.prefs.font_mode, Instant::now());
            }
        }

        self.matrix.sync(&snap.prefs, &self.events);
        self.dashboard.sync(snap.dashboard_open, &self.events, &self.config.probe_addr);
        self.seen = snap;
    }

    /// Cursor style to apply to the terminal, if it changed since last asked.
    pub fn take_cursor_change(&mut self) -> Option<CursorStyle> {
        self.cursor_change.take()
    }

    pub fn on_tick(&mut self) {
        self.ui.tick();
        if self.notifications.should_close_notification(self.ui.tick_count) {
            self.notifications.clear_notification();
        }
        self.navbar.flush(self.prefs.font_mode(), Instant::now());
    }

    pub fn on_hotkey(&mut self, action: HotkeyAction) {
        match action {
            HotkeyAction::PaletteToggled(_) => self.sound.play_click(),
            HotkeyAction::OpenSettings => {
                self.ui.set_mode(AppMode::Settings);
                self.sound.play_click();
            }
            HotkeyAction::MatrixToggled(active) => {
                self.notify_matrix(active);
                self.sound.play_success();
            }
        }
    }

    /// Run a palette command. The palette closes first.
    pub fn run_command(&mut self, action: CommandAction) {
        debug!(?action, "running command");
        self.prefs.set_palette_open(false);
        match action {
            CommandAction::GoTo(section) => {
                self.ui.set_mode(AppMode::Browse);
                self.scroll_to(section);
            }
            CommandAction::ToggleSound => {
                let muted = self.prefs.toggle_mute();
                self.sound.prime();
                self.set_notification(if muted { "Sound muted" } else { "Sound on" });
            }
            CommandAction::ToggleMatrix => {
                let active = self.prefs.toggle_matrix();
                self.notify_matrix(active);
            }
            CommandAction::OpenSettings => self.ui.set_mode(AppMode::Settings),
            CommandAction::ToggleDashboard => {
                self.prefs.toggle_dashboard();
            }
            CommandAction::CycleAccent => {
                self.prefs.step(PrefKey::AccentColor, true);
                let accent = self.prefs.accent_color();
                self.set_notification(format!("Accent: {}", accent.name()));
            }
            CommandAction::ToggleReduceMotion => self.prefs.step(PrefKey::ReduceMotion, true),
            CommandAction::ResetPreferences => self.reset_preferences(),
            CommandAction::Quit => self.ui.quit(),
        }
        self.sound.play_click();
    }

    pub fn reset_preferences(&mut self) {
        self.prefs.reset();
        info!("preferences reset from the ui");
        self.set_notification("Preferences reset");
    }

    pub fn set_notification(&mut self, message: impl Into<String>) {
        let ticks = self.config.ticks_for_ms(self.config.notification_timeout_ms);
        self.notifications.set_notification(message, Some(ticks), self.ui.tick_count);
    }

    fn notify_matrix(&mut self, active: bool) {
        self.set_notification(if active { "Matrix mode enabled" } else { "Matrix mode disabled" });
    }

    pub fn max_scroll(&self) -> u16 {
        content::page_height(self.prefs.font_mode()).saturating_sub(self.ui.viewport.height)
    }

    pub fn scroll_to(&mut self, section: Section) {
        let font = self.prefs.font_mode();
        let offset = content::section_offsets(font)
            .into_iter()
            .find_map(|(s, at)| (s == section).then_some(at))
            .unwrap_or(0);
        self.ui.scroll = offset.min(self.max_scroll());
        self.navbar.on_scroll(self.ui.scroll, font, Instant::now());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.max_scroll();
        self.ui.scroll_by(delta, max);
        self.navbar.on_scroll(self.ui.scroll, self.prefs.font_mode(), Instant::now());
    }

    /// Move `step` sections from the one the navbar highlights.
    pub fn step_section(&mut self, step: isize) {
        let len = Section::ALL.len() as isize;
        let index = (self.navbar.active().index() as isize + step).rem_euclid(len);
        self.scroll_to(Section::ALL[index as usize]);
    }

    /// Abort every timer task before the terminal is restored.
    pub fn shutdown(&mut self) {
        self.matrix.stop();
        self.dashboard.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStore;
    use crate::sound::testing::Recorder;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    fn app_over(store: &MemoryStore, recorder: &Recorder) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let prefs = Broadcaster::load(Box::new(store.clone())).shared();
        let sound = SoundManager::new(prefs.clone(), recorder.factory());
        let config = AppConfig { start_section: None, ..AppConfig::default() };
        (App::new(config, prefs, sound, tx), rx)
    }

    fn key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_event(AppEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[tokio::test]
    async fn unmute_from_palette_enables_clicks_and_survives_reload() {
        let store = MemoryStore::new();
        let recorder = Recorder::default();
        let (mut app, _rx) = app_over(&store, &recorder);
        assert!(app.prefs.muted());

        key(&mut app, KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert!(app.prefs.palette_open());
        // Muted: nothing reaches the output, and it is not even opened.
        assert_eq!(recorder.count(), 0);
        assert_eq!(recorder.opened.get(), 0);

        type_text(&mut app, "toggle-sound");
        assert_eq!(app.palette.selected_command().map(|c| c.id), Some("toggle-sound"));
        key(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(!app.prefs.palette_open());
        assert!(app.prefs.sound_enabled());
        assert!(app.sound.is_ready());
        assert_eq!(recorder.count(), 1);

        app.sound.play_click();
        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.opened.get(), 1);

        let (reloaded, _rx) = app_over(&store, &Recorder::default());
        assert!(reloaded.prefs.sound_enabled());
    }

    #[tokio::test]
    async fn palette_swallows_shift_chords() {
        let store = MemoryStore::new();
        let (mut app, _rx) = app_over(&store, &Recorder::default());
        key(&mut app, KeyCode::Char('k'), KeyModifiers::SUPER);
        key(&mut app, KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(app.ui.mode, AppMode::Browse);
        assert_eq!(app.palette.query(), "S");

        key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.prefs.palette_open());
        key(&mut app, KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(app.ui.mode, AppMode::Settings);
    }

    #[tokio::test]
    async fn matrix_timer_follows_preference() {
        let store = MemoryStore::new();
        let (mut app, _rx) = app_over(&store, &Recorder::default());
        assert!(!app.matrix.is_running());

        key(&mut app, KeyCode::Char('M'), KeyModifiers::SHIFT);
        assert!(app.prefs.matrix_active());
        assert!(app.matrix.is_running());
        assert_eq!(app.notifications.message(), Some("Matrix mode enabled"));

        key(&mut app, KeyCode::Char('M'), KeyModifiers::SHIFT);
        assert!(!app.matrix.is_running());
        app.shutdown();
    }

    #[tokio::test]
    async fn reset_from_palette_restores_defaults() {
        let store = MemoryStore::new();
        let (mut app, _rx) = app_over(&store, &Recorder::default());
        app.prefs.set_matrix_speed(12);
        app.prefs.step(PrefKey::AccentColor, true);
        app.prefs.toggle_dashboard();
        app.sync_consumers();
        assert!(app.dashboard.is_running());

        app.run_command(CommandAction::ResetPreferences);
        app.sync_consumers();
        let fresh = Broadcaster::load(Box::new(MemoryStore::new())).snapshot();
        assert_eq!(app.prefs.snapshot(), fresh);
        assert!(!app.dashboard.is_running());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn cursor_change_is_reported_once() {
        let store = MemoryStore::new();
        let (mut app, _rx) = app_over(&store, &Recorder::default());
        assert_eq!(app.take_cursor_change(), Some(CursorStyle::Block));
        assert_eq!(app.take_cursor_change(), None);

        app.prefs.set_cursor_style(CursorStyle::Bar);
        app.sync_consumers();
        assert_eq!(app.take_cursor_change(), Some(CursorStyle::Bar));
    }

    #[tokio::test]
    async fn unknown_start_section_shows_not_found() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let prefs = Broadcaster::load(Box::new(MemoryStore::new())).shared();
        let sound = SoundManager::new(prefs.clone(), Recorder::default().factory());
        let config = AppConfig { start_section: Some("blog".into()), ..AppConfig::default() };
        let mut app = App::new(config, prefs, sound, tx);
        assert_eq!(app.ui.mode, AppMode::NotFound("blog".into()));

        key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.ui.mode, AppMode::Browse);
        assert_eq!(app.ui.scroll, 0);
    }

    #[tokio::test]
    async fn number_keys_jump_to_sections() {
        let (mut app, _rx) = app_over(&MemoryStore::new(), &Recorder::default());
        key(&mut app, KeyCode::Char('4'), KeyModifiers::NONE);
        let font = app.prefs.font_mode();
        let projects = content::section_offsets(font)[3].1;
        assert_eq!(app.ui.scroll, projects.min(app.max_scroll()));
    }
}
