//! Global hotkeys, seen before any screen-specific handler.
//!
//! The router owns the Easter-egg sequence tracker and the fixed chords.
//! `App` holds exactly one router; a second one would count every keystroke
//! twice.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::prefs::Broadcaster;

pub const EASTER_EGG: [KeyCode; 10] = [
    KeyCode::Up,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Char('b'),
    KeyCode::Char('a'),
];

fn same_key(expected: KeyCode, got: KeyCode) -> bool {
    match (expected, got) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    }
}

/// Linear progress through [`EASTER_EGG`]. A wrong key anywhere restarts
/// from zero; there is no retry from a matching suffix.
#[derive(Debug, Default, Clone)]
pub struct SequenceTracker {
    progress: usize,
}

impl SequenceTracker {
    /// Returns true when `code` completes the sequence.
    pub fn observe(&mut self, code: KeyCode) -> bool {
        if same_key(EASTER_EGG[self.progress], code) {
            self.progress += 1;
            if self.progress == EASTER_EGG.len() {
                self.progress = 0;
                return true;
            }
        } else {
            self.progress = 0;
        }
        false
    }

    pub fn progress(&self) -> usize {
        self.progress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Palette visibility after the toggle.
    PaletteToggled(bool),
    OpenSettings,
    /// Matrix state after the toggle.
    MatrixToggled(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteOutcome {
    pub action: Option<HotkeyAction>,
    /// The key must not reach any other handler.
    pub consumed: bool,
}

#[derive(Debug)]
pub struct HotkeyRouter {
    tracker: SequenceTracker,
    matrix_chord: bool,
}

impl HotkeyRouter {
    pub fn new(matrix_chord: bool) -> Self {
        Self { tracker: SequenceTracker::default(), matrix_chord }
    }

    #[cfg(test)]
    pub fn sequence_progress(&self) -> usize {
        self.tracker.progress()
    }

    /// Route one key press. `text_focus` is set while a text field owns the
    /// keyboard; Shift chords are ignored then so capital letters can be
    /// typed, but the sequence tracker still sees every key.
    pub fn handle(&mut self, key: KeyEvent, text_focus: bool, prefs: &Broadcaster) -> RouteOutcome {
        let completed = self.tracker.observe(key.code);

        if is_platform_chord(key, 'k') {
            let open = prefs.toggle_palette();
            return RouteOutcome { action: Some(HotkeyAction::PaletteToggled(open)), consumed: true };
        }

        if !text_focus && is_shift_chord(key, 'S') {
            return RouteOutcome { action: Some(HotkeyAction::OpenSettings), consumed: true };
        }

        if self.matrix_chord && !text_focus && is_shift_chord(key, 'M') {
            let active = prefs.toggle_matrix();
            return RouteOutcome { action: Some(HotkeyAction::MatrixToggled(active)), consumed: true };
        }

        if completed {
            let active = prefs.toggle_matrix();
            info!(active, "easter egg sequence entered");
            return RouteOutcome { action: Some(HotkeyAction::MatrixToggled(active)), consumed: false };
        }

        RouteOutcome::default()
    }
}

fn is_platform_chord(key: KeyEvent, letter: char) -> bool {
    let modifier = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
    modifier && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&letter))
}

fn is_shift_chord(key: KeyEvent, upper: char) -> bool {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) {
        return false;
    }
    match key.code {
        KeyCode::Char(c) if c == upper => true,
        KeyCode::Char(c) => {
            key.modifiers.contains(KeyModifiers::SHIFT) && c.to_ascii_uppercase() == upper
        }
        _ => false,
    }
}
