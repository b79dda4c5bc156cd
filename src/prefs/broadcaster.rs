//! Global preference broadcaster.
//!
//! One `Broadcaster` per app, shared as `Arc<Broadcaster>` with every
//! consumer at construction time. It is the only component that talks to the
//! preference store. Every mutation persists the key, re-derives the style
//! surface and publishes a fresh [`Snapshot`] on a watch channel.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    clamp_speed, AccentColor, BorderRadius, Choice, CursorStyle, FontMode, PrefError, PrefKey,
    PreferenceSet, PreferenceStore, StyleSurface,
};

/// Everything a consumer needs to render, published as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub prefs: PreferenceSet,
    pub surface: StyleSurface,
    pub palette_open: bool,
    pub dashboard_open: bool,
}

impl Snapshot {
    fn fresh(prefs: PreferenceSet) -> Self {
        Self {
            surface: StyleSurface::project(&prefs),
            prefs,
            palette_open: false,
            dashboard_open: false,
        }
    }
}

pub struct Broadcaster {
    store: Box<dyn PreferenceStore>,
    state: watch::Sender<Snapshot>,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("store", &self.store.name())
            .field("receivers", &self.state.receiver_count())
            .finish()
    }
}

impl Broadcaster {
    /// Load every key from `store` before anything renders.
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let prefs = PreferenceSet::load(store.as_ref());
        info!(backend = store.name(), ?prefs, "preferences loaded");
        let (state, _) = watch::channel(Snapshot::fresh(prefs));
        Self { store, state }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    pub fn prefs(&self) -> PreferenceSet {
        self.state.borrow().prefs
    }

    pub fn surface(&self) -> StyleSurface {
        self.state.borrow().surface.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    pub fn muted(&self) -> bool {
        self.prefs().muted
    }

    pub fn sound_enabled(&self) -> bool {
        !self.muted()
    }

    pub fn matrix_active(&self) -> bool {
        self.prefs().matrix_active
    }

    pub fn matrix_speed(&self) -> u8 {
        self.prefs().matrix_speed
    }

    pub fn accent_color(&self) -> AccentColor {
        self.prefs().accent_color
    }

    pub fn reduce_motion(&self) -> bool {
        self.prefs().reduce_motion
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.prefs().cursor_style
    }

    pub fn font_mode(&self) -> FontMode {
        self.prefs().font_mode
    }

    pub fn palette_open(&self) -> bool {
        self.state.borrow().palette_open
    }

    pub fn dashboard_open(&self) -> bool {
        self.state.borrow().dashboard_open
    }

    pub fn set_muted(&self, muted: bool) {
        self.commit(PrefKey::Muted, |p| p.muted = muted);
    }

    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted();
        self.set_muted(muted);
        muted
    }

    pub fn set_matrix_active(&self, active: bool) {
        self.commit(PrefKey::MatrixActive, |p| p.matrix_active = active);
    }

    /// Flip matrix mode, returning the new state.
    pub fn toggle_matrix(&self) -> bool {
        let active = !self.matrix_active();
        self.set_matrix_active(active);
        active
    }

    /// Clamped into the slider range; programmatic callers cannot push the
    /// speed outside it.
    pub fn set_matrix_speed(&self, speed: i64) {
        let speed = clamp_speed(speed);
        self.commit(PrefKey::MatrixSpeed, |p| p.matrix_speed = speed);
    }

    pub fn set_accent_color(&self, accent: AccentColor) {
        self.commit(PrefKey::AccentColor, |p| p.accent_color = accent);
    }

    pub fn set_reduce_motion(&self, reduce: bool) {
        self.commit(PrefKey::ReduceMotion, |p| p.reduce_motion = reduce);
    }

    pub fn set_cursor_style(&self, style: CursorStyle) {
        self.commit(PrefKey::CursorStyle, |p| p.cursor_style = style);
    }

    pub fn set_font_mode(&self, mode: FontMode) {
        self.commit(PrefKey::FontMode, |p| p.font_mode = mode);
    }

    pub fn set_border_radius(&self, radius: BorderRadius) {
        self.commit(PrefKey::BorderRadius, |p| p.border_radius = radius);
    }

    /// Set a key from its textual form. Values outside the key's domain are
    /// rejected and leave the preference untouched.
    pub fn set_from_str(&self, key: PrefKey, raw: &str) -> Result<(), PrefError> {
        let mut prefs = self.prefs();
        prefs.decode(key, raw)?;
        self.commit(key, |p| *p = prefs);
        Ok(())
    }

    /// Apply textual overrides in order. Rejected values are logged and
    /// skipped; returns how many were applied.
    pub fn apply_overrides(&self, overrides: &[(PrefKey, String)]) -> usize {
        let mut applied = 0;
        for (key, raw) in overrides {
            match self.set_from_str(*key, raw) {
                Ok(()) => applied += 1,
                Err(err) => warn!(error = %err, "ignoring preference override"),
            }
        }
        applied
    }

    /// Step a key forward (`forward`) or backward through its domain. Booleans
    /// flip, the speed moves by one.
    pub fn step(&self, key: PrefKey, forward: bool) {
        let p = self.prefs();
        match key {
            PrefKey::Muted => self.set_muted(!p.muted),
            PrefKey::MatrixActive => self.set_matrix_active(!p.matrix_active),
            PrefKey::MatrixSpeed => {
                let delta = if forward { 1 } else { -1 };
                self.set_matrix_speed(p.matrix_speed as i64 + delta)
            }
            PrefKey::AccentColor => self.set_accent_color(if forward {
                p.accent_color.next()
            } else {
                p.accent_color.prev()
            }),
            PrefKey::ReduceMotion => self.set_reduce_motion(!p.reduce_motion),
            PrefKey::CursorStyle => self.set_cursor_style(if forward {
                p.cursor_style.next()
            } else {
                p.cursor_style.prev()
            }),
            PrefKey::FontMode => self.set_font_mode(if forward {
                p.font_mode.next()
            } else {
                p.font_mode.prev()
            }),
            PrefKey::BorderRadius => self.set_border_radius(if forward {
                p.border_radius.next()
            } else {
                p.border_radius.prev()
            }),
        }
    }

    pub fn set_palette_open(&self, open: bool) {
        self.publish(|snap| snap.palette_open = open);
    }

    pub fn toggle_palette(&self) -> bool {
        let open = !self.palette_open();
        self.set_palette_open(open);
        open
    }

    pub fn set_dashboard_open(&self, open: bool) {
        self.publish(|snap| snap.dashboard_open = open);
    }

    pub fn toggle_dashboard(&self) -> bool {
        let open = !self.dashboard_open();
        self.set_dashboard_open(open);
        open
    }

    /// Restore every key to its default and clear its persisted entry. The
    /// resulting state equals a fresh session over empty storage.
    pub fn reset(&self) {
        for key in PrefKey::ALL {
            self.store.clear(key.storage_key());
        }
        let fresh = Snapshot::fresh(PreferenceSet::default());
        self.state.send_replace(fresh);
        info!("preferences reset to defaults");
    }

    fn commit(&self, key: PrefKey, update: impl FnOnce(&mut PreferenceSet)) {
        let mut prefs = self.prefs();
        update(&mut prefs);
        let encoded = prefs.encode(key);
        self.store.write(key.storage_key(), &encoded);
        self.state.send_modify(|snap| {
            snap.prefs = prefs;
            if key.has_presentation_effect() {
                snap.surface.apply(key, &prefs);
            }
        });
        debug!(key = %key, value = %encoded, "preference updated");
    }

    fn publish(&self, update: impl FnOnce(&mut Snapshot)) {
        self.state.send_modify(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::surface::{ATTR_ACCENT, ATTR_CURSOR, PROP_ACCENT, PROP_MOTION_SCALE, PROP_RADIUS};
    use crate::prefs::MemoryStore;

    fn broadcaster(store: &MemoryStore) -> Broadcaster {
        Broadcaster::load(Box::new(store.clone()))
    }

    fn scramble(prefs: &Broadcaster) {
        prefs.set_muted(false);
        prefs.set_matrix_active(true);
        prefs.set_matrix_speed(17);
        prefs.set_accent_color(AccentColor::Red);
        prefs.set_reduce_motion(true);
        prefs.set_cursor_style(CursorStyle::Bar);
        prefs.set_font_mode(FontMode::Mono);
        prefs.set_border_radius(BorderRadius::Square);
        prefs.set_palette_open(true);
        prefs.set_dashboard_open(true);
    }

    #[test]
    fn reset_restores_every_default() {
        let store = MemoryStore::new();
        let prefs = broadcaster(&store);
        scramble(&prefs);

        prefs.reset();

        assert_eq!(prefs.prefs(), PreferenceSet::default());
        for key in PrefKey::ALL {
            assert!(store.read(key.storage_key()).is_none(), "{key} still persisted");
        }
    }

    #[test]
    fn reset_is_indistinguishable_from_fresh_session() {
        let store = MemoryStore::new();
        let prefs = broadcaster(&store);
        scramble(&prefs);
        prefs.reset();

        let reloaded = broadcaster(&store);
        let fresh = broadcaster(&MemoryStore::new());
        assert_eq!(prefs.snapshot(), fresh.snapshot());
        assert_eq!(reloaded.snapshot(), fresh.snapshot());
    }

    #[test]
    fn reset_reaches_subscribers() {
        let prefs = broadcaster(&MemoryStore::new());
        let mut rx = prefs.subscribe();
        scramble(&prefs);
        prefs.reset();
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.prefs, PreferenceSet::default());
        assert!(!seen.palette_open);
    }

    #[test]
    fn boolean_toggles_persist_each_step() {
        let store = MemoryStore::new();
        type Toggle = fn(&Broadcaster) -> bool;
        let cases: [(PrefKey, Toggle); 3] = [
            (PrefKey::Muted, |b: &Broadcaster| b.toggle_mute()),
            (PrefKey::MatrixActive, |b: &Broadcaster| b.toggle_matrix()),
            (PrefKey::ReduceMotion, |b: &Broadcaster| {
                let next = !b.reduce_motion();
                b.set_reduce_motion(next);
                next
            }),
        ];
        for (key, toggle) in cases {
            let initial = broadcaster(&store).prefs().encode(key);

            let first = broadcaster(&store);
            let flipped = toggle(&first);
            // Simulated reload between toggles.
            let second = broadcaster(&store);
            assert_eq!(second.prefs().encode(key), flipped.to_string());
            toggle(&second);

            let third = broadcaster(&store);
            assert_eq!(third.prefs().encode(key), initial, "{key}");
        }
    }

    #[test]
    fn invalid_enum_strings_are_not_accepted() {
        let store = MemoryStore::new();
        let prefs = broadcaster(&store);
        let mut rx = prefs.subscribe();

        assert!(prefs.set_from_str(PrefKey::AccentColor, "magenta").is_err());
        assert!(prefs.set_from_str(PrefKey::CursorStyle, "beam").is_err());
        assert!(prefs.set_from_str(PrefKey::FontMode, "").is_err());
        assert!(prefs.set_from_str(PrefKey::BorderRadius, "ROUNDED").is_err());

        assert!(!rx.has_changed().unwrap());
        assert!(store.is_empty());

        prefs.set_from_str(PrefKey::AccentColor, "orange").unwrap();
        assert_eq!(prefs.accent_color(), AccentColor::Orange);
        assert_eq!(store.read("accent_color").as_deref(), Some("orange"));
    }

    #[test]
    fn overrides_skip_rejected_values() {
        let store = MemoryStore::new();
        let prefs = broadcaster(&store);
        let applied = prefs.apply_overrides(&[
            (PrefKey::AccentColor, "teal".to_string()),
            (PrefKey::CursorStyle, "bar".to_string()),
            (PrefKey::MatrixSpeed, "40".to_string()),
        ]);
        assert_eq!(applied, 1);
        assert_eq!(prefs.accent_color(), AccentColor::Green);
        assert_eq!(prefs.cursor_style(), CursorStyle::Bar);
        assert_eq!(prefs.matrix_speed(), 5);
        assert_eq!(store.read("cursor_style").as_deref(), Some("bar"));
        assert_eq!(store.read("accent_color"), None);
    }

    #[test]
    fn forged_persisted_enum_falls_back_to_default() {
        let store = MemoryStore::new();
        store.write("accent_color", "url(javascript:alert(1))");
        store.write("cursor_style", "bar");
        let prefs = broadcaster(&store);
        assert_eq!(prefs.accent_color(), AccentColor::Green);
        assert_eq!(prefs.cursor_style(), CursorStyle::Bar);
        assert_eq!(prefs.surface().attribute(ATTR_ACCENT), Some("green"));
    }

    #[test]
    fn speed_is_clamped_on_mutation() {
        let prefs = broadcaster(&MemoryStore::new());
        prefs.set_matrix_speed(99);
        assert_eq!(prefs.matrix_speed(), 20);
        prefs.set_matrix_speed(-4);
        assert_eq!(prefs.matrix_speed(), 1);
        prefs.step(PrefKey::MatrixSpeed, false);
        assert_eq!(prefs.matrix_speed(), 1);
    }

    #[test]
    fn mutations_update_surface() {
        let prefs = broadcaster(&MemoryStore::new());
        prefs.set_accent_color(AccentColor::Purple);
        prefs.set_reduce_motion(true);
        prefs.set_border_radius(BorderRadius::Square);
        prefs.step(PrefKey::CursorStyle, true);

        let surface = prefs.surface();
        assert_eq!(surface.property(PROP_ACCENT), Some("#a855f7"));
        assert_eq!(surface.attribute(ATTR_ACCENT), Some("purple"));
        assert_eq!(surface.property(PROP_MOTION_SCALE), Some("0"));
        assert_eq!(surface.property(PROP_RADIUS), Some("0px"));
        assert_eq!(surface.attribute(ATTR_CURSOR), Some("underline"));
        assert_eq!(surface, StyleSurface::project(&prefs.prefs()));
    }

    #[test]
    fn denied_storage_keeps_value_for_session() {
        let prefs = broadcaster(&MemoryStore::denied());
        prefs.set_muted(false);
        assert!(prefs.sound_enabled());
    }

    #[test]
    fn overlays_are_not_persisted() {
        let store = MemoryStore::new();
        let prefs = broadcaster(&store);
        assert!(prefs.toggle_palette());
        assert!(prefs.toggle_dashboard());
        assert!(store.is_empty());
        let reloaded = broadcaster(&store);
        assert!(!reloaded.palette_open());
        assert!(!reloaded.dashboard_open());
    }
}
