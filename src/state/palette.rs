//! Command palette state.
//!
//! Commands are rebuilt from the current snapshot whenever the palette opens
//! or preferences change while it is open, so labels such as "Mute Sound" /
//! "Unmute Sound" track state.
//!
//! Invariant: `selected < filtered.len()`, or `selected == 0` when nothing
//! matches.

use crate::content::Section;
use crate::prefs::{Choice, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    GoTo(Section),
    ToggleSound,
    ToggleMatrix,
    OpenSettings,
    ToggleDashboard,
    CycleAccent,
    ToggleReduceMotion,
    ResetPreferences,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: &'static str,
    pub label: String,
    pub category: &'static str,
    pub action: CommandAction,
    pub shortcut: Option<&'static str>,
}

impl Command {
    fn new(id: &'static str, label: impl Into<String>, category: &'static str, action: CommandAction) -> Self {
        Self { id, label: label.into(), category, action, shortcut: None }
    }

    fn with_shortcut(mut self, shortcut: &'static str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Case-insensitive substring match on label or id. `needle` must already
    /// be lowercase.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.label.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}

const NAV_SHORTCUTS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

pub fn build_commands(snapshot: &Snapshot) -> Vec<Command> {
    let prefs = &snapshot.prefs;
    let mut commands: Vec<Command> = Section::ALL
        .into_iter()
        .zip(NAV_SHORTCUTS)
        .map(|(section, key)| {
            Command::new(section_command_id(section), format!("Go to {}", section.title()), "Navigation", CommandAction::GoTo(section))
                .with_shortcut(key)
        })
        .collect();

    commands.push(Command::new(
        "toggle-sound",
        if prefs.muted { "Unmute Sound" } else { "Mute Sound" },
        "System",
        CommandAction::ToggleSound,
    ));
    commands.push(
        Command::new(
            "toggle-matrix",
            if prefs.matrix_active { "Disable Matrix Mode" } else { "Enable Matrix Mode" },
            "System",
            CommandAction::ToggleMatrix,
        )
        .with_shortcut("↑↑↓↓←→←→BA"),
    );
    commands.push(
        Command::new(
            "toggle-dashboard",
            if snapshot.dashboard_open { "Hide System Dashboard" } else { "Show System Dashboard" },
            "System",
            CommandAction::ToggleDashboard,
        )
        .with_shortcut("d"),
    );
    commands.push(
        Command::new("open-settings", "Open Settings", "Preferences", CommandAction::OpenSettings)
            .with_shortcut("Shift+S"),
    );
    commands.push(Command::new(
        "cycle-accent",
        format!("Cycle Accent Color ({})", prefs.accent_color.name()),
        "Preferences",
        CommandAction::CycleAccent,
    ));
    commands.push(Command::new(
        "toggle-motion",
        if prefs.reduce_motion { "Restore Motion" } else { "Reduce Motion" },
        "Preferences",
        CommandAction::ToggleReduceMotion,
    ));
    commands.push(Command::new(
        "reset-preferences",
        "Reset Preferences",
        "Preferences",
        CommandAction::ResetPreferences,
    ));
    commands.push(Command::new("quit", "Quit", "System", CommandAction::Quit).with_shortcut("q"));
    commands
}

fn section_command_id(section: Section) -> &'static str {
    match section {
        Section::Hero => "nav-hero",
        Section::About => "nav-about",
        Section::Philosophy => "nav-philosophy",
        Section::Projects => "nav-projects",
        Section::Stack => "nav-stack",
        Section::Writing => "nav-writing",
        Section::Testimonials => "nav-testimonials",
        Section::Contact => "nav-contact",
    }
}

#[derive(Debug, Default)]
pub struct CommandPalette {
    commands: Vec<Command>,
    query: String,
    /// Indices into `commands`, in display order.
    filtered: Vec<usize>,
    selected: usize,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh palette: empty query, first entry selected.
    pub fn open(&mut self, commands: Vec<Command>) {
        self.commands = commands;
        self.query.clear();
        self.selected = 0;
        self.update_filtered();
    }

    /// Swap in rebuilt commands without touching the query.
    pub fn refresh(&mut self, commands: Vec<Command>) {
        self.commands = commands;
        self.update_filtered();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
        self.update_filtered();
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    pub fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + self.filtered.len() - 1) % self.filtered.len();
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn result_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn results(&self) -> impl Iterator<Item = &Command> {
        self.filtered.iter().filter_map(|&i| self.commands.get(i))
    }

    pub fn selected_command(&self) -> Option<&Command> {
        self.filtered.get(self.selected).and_then(|&i| self.commands.get(i))
    }

    fn update_filtered(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matches(&needle))
            .map(|(i, _)| i)
            .collect();
        if self.filtered.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.filtered.len() - 1);
        }
    }
}
