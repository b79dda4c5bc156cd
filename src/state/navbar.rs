use std::time::{Duration, Instant};

use crate::content::{self, Section};
use crate::prefs::FontMode;

/// Minimum spacing between applied scroll samples.
pub const SCROLL_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Navbar view of the page: which section is active and whether the page has
/// scrolled past the hero. Scroll positions are sampled at most once per
/// [`SCROLL_SAMPLE_INTERVAL`]; a sample that arrives too early is parked and
/// applied by the next `flush`.
#[derive(Debug)]
pub struct NavbarState {
    active: Section,
    compact: bool,
    last_applied: Option<Instant>,
    pending: Option<u16>,
}

impl Default for NavbarState {
    fn default() -> Self {
        Self { active: Section::Hero, compact: false, last_applied: None, pending: None }
    }
}

impl NavbarState {
    pub fn active(&self) -> Section {
        self.active
    }

    /// The hero has scrolled out of view.
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn on_scroll(&mut self, scroll: u16, font: FontMode, now: Instant) {
        let due = self
            .last_applied
            .map_or(true, |last| now.duration_since(last) >= SCROLL_SAMPLE_INTERVAL);
        if due {
            self.apply(scroll, font, now);
        } else {
            self.pending = Some(scroll);
        }
    }

    /// Apply a parked sample once the interval has passed.
    pub fn flush(&mut self, font: FontMode, now: Instant) {
        let Some(scroll) = self.pending else {
            return;
        };
        let due = self
            .last_applied
            .map_or(true, |last| now.duration_since(last) >= SCROLL_SAMPLE_INTERVAL);
        if due {
            self.apply(scroll, font, now);
        }
    }

    fn apply(&mut self, scroll: u16, font: FontMode, now: Instant) {
        self.pending = None;
        self.last_applied = Some(now);
        self.active = content::section_at(scroll, font);
        self.compact = scroll >= content::section_height(Section::Hero, font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_debounced_then_flushed() {
        let font = FontMode::Sans;
        let offsets = content::section_offsets(font);
        let (projects, projects_at) = offsets[3];
        let (writing, writing_at) = offsets[5];

        let start = Instant::now();
        let mut nav = NavbarState::default();
        nav.on_scroll(projects_at, font, start);
        assert_eq!(nav.active(), projects);
        assert!(nav.is_compact());

        nav.on_scroll(writing_at, font, start + Duration::from_millis(20));
        assert_eq!(nav.active(), projects);
        assert!(nav.has_pending());

        nav.flush(font, start + Duration::from_millis(60));
        assert_eq!(nav.active(), projects);

        nav.flush(font, start + Duration::from_millis(120));
        assert_eq!(nav.active(), writing);
        assert!(!nav.has_pending());
    }

    #[test]
    fn back_at_top_is_not_compact() {
        let font = FontMode::Mono;
        let start = Instant::now();
        let mut nav = NavbarState::default();
        nav.on_scroll(40, font, start);
        nav.on_scroll(0, font, start + SCROLL_SAMPLE_INTERVAL);
        assert_eq!(nav.active(), Section::Hero);
        assert!(!nav.is_compact());
    }
}
