//! Style surface: the document-level markers derived from the preference set.
//!
//! Renderers that only care about presentation read `data-*` attributes and
//! `--*` properties from here instead of subscribing to the full snapshot.
//! The surface is always recomputed from preferences and never written back.

use std::collections::BTreeMap;

use super::{BorderRadius, Choice, FontMode, PrefKey, PreferenceSet};

pub const ATTR_ACCENT: &str = "data-accent";
pub const ATTR_CURSOR: &str = "data-cursor";
pub const ATTR_FONT: &str = "data-font";
pub const ATTR_RADIUS: &str = "data-radius";

pub const PROP_ACCENT: &str = "--accent";
pub const PROP_MOTION_SCALE: &str = "--motion-scale";
pub const PROP_FONT_FAMILY: &str = "--font-family";
pub const PROP_RADIUS: &str = "--radius";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSurface {
    attributes: BTreeMap<&'static str, String>,
    properties: BTreeMap<&'static str, String>,
}

impl StyleSurface {
    /// Full projection of `prefs`.
    pub fn project(prefs: &PreferenceSet) -> Self {
        let mut surface = Self::default();
        for key in PrefKey::ALL {
            surface.apply(key, prefs);
        }
        surface
    }

    /// Re-derive the markers owned by `key`. Keys without presentation
    /// effects leave the surface untouched.
    pub fn apply(&mut self, key: PrefKey, prefs: &PreferenceSet) {
        match key {
            PrefKey::AccentColor => {
                self.properties.insert(PROP_ACCENT, prefs.accent_color.hex().to_string());
                self.attributes.insert(ATTR_ACCENT, prefs.accent_color.name());
            }
            PrefKey::ReduceMotion => {
                let scale = if prefs.reduce_motion { "0" } else { "1" };
                self.properties.insert(PROP_MOTION_SCALE, scale.to_string());
            }
            PrefKey::CursorStyle => {
                self.attributes.insert(ATTR_CURSOR, prefs.cursor_style.name());
            }
            PrefKey::FontMode => {
                self.attributes.insert(ATTR_FONT, prefs.font_mode.name());
                let family = match prefs.font_mode {
                    FontMode::Sans => "ui-sans-serif",
                    FontMode::Mono => "ui-monospace",
                };
                self.properties.insert(PROP_FONT_FAMILY, family.to_string());
            }
            PrefKey::BorderRadius => {
                self.attributes.insert(ATTR_RADIUS, prefs.border_radius.name());
                let radius = match prefs.border_radius {
                    BorderRadius::Rounded => "0.5rem",
                    BorderRadius::Square => "0px",
                };
                self.properties.insert(PROP_RADIUS, radius.to_string());
            }
            PrefKey::Muted | PrefKey::MatrixActive | PrefKey::MatrixSpeed => {}
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{AccentColor, CursorStyle};

    #[test]
    fn default_projection_is_exact() {
        let surface = StyleSurface::project(&PreferenceSet::default());
        assert_eq!(surface.property(PROP_ACCENT), Some("#00ff41"));
        assert_eq!(surface.attribute(ATTR_ACCENT), Some("green"));
        assert_eq!(surface.property(PROP_MOTION_SCALE), Some("1"));
        assert_eq!(surface.attribute(ATTR_CURSOR), Some("block"));
        assert_eq!(surface.attribute(ATTR_FONT), Some("sans"));
        assert_eq!(surface.property(PROP_FONT_FAMILY), Some("ui-sans-serif"));
        assert_eq!(surface.attribute(ATTR_RADIUS), Some("rounded"));
        assert_eq!(surface.property(PROP_RADIUS), Some("0.5rem"));
    }

    #[test]
    fn apply_only_touches_its_key() {
        let mut prefs = PreferenceSet::default();
        let mut surface = StyleSurface::project(&prefs);
        prefs.accent_color = AccentColor::Blue;
        prefs.cursor_style = CursorStyle::Bar;

        surface.apply(PrefKey::AccentColor, &prefs);
        assert_eq!(surface.attribute(ATTR_ACCENT), Some("blue"));
        assert_eq!(surface.property(PROP_ACCENT), Some("#3b82f6"));
        assert_eq!(surface.attribute(ATTR_CURSOR), Some("block"));
    }

    #[test]
    fn non_presentation_keys_have_no_markers() {
        let mut prefs = PreferenceSet::default();
        let surface = StyleSurface::project(&prefs);
        prefs.muted = false;
        prefs.matrix_speed = 19;
        let mut after = surface.clone();
        after.apply(PrefKey::Muted, &prefs);
        after.apply(PrefKey::MatrixSpeed, &prefs);
        assert_eq!(surface, after);
    }
}
