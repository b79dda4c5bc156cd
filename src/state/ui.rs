use ratatui::layout::Rect;

use crate::prefs::PrefKey;

#[derive(PartialEq, Debug, Clone)]
pub enum AppMode {
    Browse,
    Settings,
    /// Requested section id that does not exist.
    NotFound(String),
}

/// State management for UI-specific state
pub struct UiState {
    pub mode: AppMode,
    pub should_quit: bool,
    pub tick_count: u64,

    /// Current page scroll, in lines.
    pub scroll: u16,
    /// Last area the page was drawn into.
    pub viewport: Rect,

    // Settings modal row; rows past the last key are the reset button.
    pub settings_selected: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: AppMode::Browse,
            should_quit: false,
            tick_count: 0,
            scroll: 0,
            viewport: Rect::default(),
            settings_selected: 0,
        }
    }
}

pub const SETTINGS_ROWS: usize = PrefKey::ALL.len() + 1;

impl UiState {
    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn settings_key(&self) -> Option<PrefKey> {
        PrefKey::ALL.get(self.settings_selected).copied()
    }

    pub fn settings_next(&mut self) {
        self.settings_selected = (self.settings_selected + 1) % SETTINGS_ROWS;
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = (self.settings_selected + SETTINGS_ROWS - 1) % SETTINGS_ROWS;
    }

    pub fn scroll_by(&mut self, delta: i32, max: u16) {
        let next = (self.scroll as i32 + delta).clamp(0, max as i32);
        self.scroll = next as u16;
    }
}
