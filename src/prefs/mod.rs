//! Preference set shared by every screen.
//!
//! The set is flat: eight keys, each with a storage name, a closed value
//! domain and a default. Values cross the storage boundary as strings;
//! anything that does not decode into its domain is replaced by the default.

pub mod broadcaster;
pub mod store;
pub mod surface;

pub use broadcaster::{Broadcaster, Snapshot};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use surface::StyleSurface;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const MATRIX_SPEED_MIN: u8 = 1;
pub const MATRIX_SPEED_MAX: u8 = 20;
pub const DEFAULT_MATRIX_SPEED: u8 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrefError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: PrefKey, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    Muted,
    MatrixActive,
    MatrixSpeed,
    AccentColor,
    ReduceMotion,
    CursorStyle,
    FontMode,
    BorderRadius,
}

impl PrefKey {
    pub const ALL: [PrefKey; 8] = [
        PrefKey::Muted,
        PrefKey::MatrixActive,
        PrefKey::MatrixSpeed,
        PrefKey::AccentColor,
        PrefKey::ReduceMotion,
        PrefKey::CursorStyle,
        PrefKey::FontMode,
        PrefKey::BorderRadius,
    ];

    /// Name of the persisted entry.
    pub fn storage_key(self) -> &'static str {
        match self {
            PrefKey::Muted => "sound_muted",
            PrefKey::MatrixActive => "matrix_mode",
            PrefKey::MatrixSpeed => "matrix_speed",
            PrefKey::AccentColor => "accent_color",
            PrefKey::ReduceMotion => "reduce_motion",
            PrefKey::CursorStyle => "cursor_style",
            PrefKey::FontMode => "font_mode",
            PrefKey::BorderRadius => "border_radius",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrefKey::Muted => "Sound",
            PrefKey::MatrixActive => "Matrix Rain",
            PrefKey::MatrixSpeed => "Matrix Speed",
            PrefKey::AccentColor => "Accent Color",
            PrefKey::ReduceMotion => "Reduce Motion",
            PrefKey::CursorStyle => "Cursor Style",
            PrefKey::FontMode => "Font",
            PrefKey::BorderRadius => "Corners",
        }
    }

    /// Keys whose change must be reflected on the style surface.
    pub fn has_presentation_effect(self) -> bool {
        matches!(
            self,
            PrefKey::AccentColor
                | PrefKey::ReduceMotion
                | PrefKey::CursorStyle
                | PrefKey::FontMode
                | PrefKey::BorderRadius
        )
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Enum preference with a closed set of values. The storage form is the
/// lowercase serde name of the variant.
pub trait Choice: Copy + PartialEq + Serialize + DeserializeOwned + 'static {
    const KEY: PrefKey;
    const ALL: &'static [Self];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn name(self) -> String {
        match serde_json::to_value(self) {
            Ok(Value::String(name)) => name,
            _ => String::new(),
        }
    }

    fn parse(raw: &str) -> Result<Self, PrefError> {
        serde_json::from_value(Value::String(raw.to_string()))
            .map_err(|_| PrefError::InvalidValue { key: Self::KEY, value: raw.to_string() })
    }
}

/// Site-wide accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Green,
    Orange,
    Blue,
    Red,
    Purple,
}

impl Choice for AccentColor {
    const KEY: PrefKey = PrefKey::AccentColor;
    const ALL: &'static [Self] = &[
        AccentColor::Green,
        AccentColor::Orange,
        AccentColor::Blue,
        AccentColor::Red,
        AccentColor::Purple,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Block,
    Underline,
    Bar,
}

impl Choice for CursorStyle {
    const KEY: PrefKey = PrefKey::CursorStyle;
    const ALL: &'static [Self] = &[CursorStyle::Block, CursorStyle::Underline, CursorStyle::Bar];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontMode {
    #[default]
    Sans,
    Mono,
}

impl Choice for FontMode {
    const KEY: PrefKey = PrefKey::FontMode;
    const ALL: &'static [Self] = &[FontMode::Sans, FontMode::Mono];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderRadius {
    #[default]
    Rounded,
    Square,
}

impl Choice for BorderRadius {
    const KEY: PrefKey = PrefKey::BorderRadius;
    const ALL: &'static [Self] = &[BorderRadius::Rounded, BorderRadius::Square];
}

impl AccentColor {
    pub fn hex(self) -> &'static str {
        match self {
            AccentColor::Green => "#00ff41",
            AccentColor::Orange => "#ff9f1c",
            AccentColor::Blue => "#3b82f6",
            AccentColor::Red => "#ff3b30",
            AccentColor::Purple => "#a855f7",
        }
    }
}

/// The full preference set. Every field always holds a value from its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceSet {
    pub muted: bool,
    pub matrix_active: bool,
    pub matrix_speed: u8,
    pub accent_color: AccentColor,
    pub reduce_motion: bool,
    pub cursor_style: CursorStyle,
    pub font_mode: FontMode,
    pub border_radius: BorderRadius,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            muted: true,
            matrix_active: false,
            matrix_speed: DEFAULT_MATRIX_SPEED,
            accent_color: AccentColor::default(),
            reduce_motion: false,
            cursor_style: CursorStyle::default(),
            font_mode: FontMode::default(),
            border_radius: BorderRadius::default(),
        }
    }
}

pub fn clamp_speed(speed: i64) -> u8 {
    speed.clamp(MATRIX_SPEED_MIN as i64, MATRIX_SPEED_MAX as i64) as u8
}

impl PreferenceSet {
    /// Read every key from `store`, keeping the default for anything absent
    /// or undecodable.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mut prefs = Self::default();
        for key in PrefKey::ALL {
            let Some(raw) = store.read(key.storage_key()) else {
                continue;
            };
            if let Err(err) = prefs.decode(key, &raw) {
                warn!(key = %key, raw = %raw, error = %err, "discarding persisted preference");
            }
        }
        prefs
    }

    /// Storage representation of one key: JSON for booleans and the speed,
    /// the bare variant name for enums.
    pub fn encode(&self, key: PrefKey) -> String {
        match key {
            PrefKey::Muted => json_bool(self.muted),
            PrefKey::MatrixActive => json_bool(self.matrix_active),
            PrefKey::MatrixSpeed => self.matrix_speed.to_string(),
            PrefKey::AccentColor => self.accent_color.name(),
            PrefKey::ReduceMotion => json_bool(self.reduce_motion),
            PrefKey::CursorStyle => self.cursor_style.name(),
            PrefKey::FontMode => self.font_mode.name(),
            PrefKey::BorderRadius => self.border_radius.name(),
        }
    }

    /// Decode a persisted value into `key`. On error the set is untouched.
    pub fn decode(&mut self, key: PrefKey, raw: &str) -> Result<(), PrefError> {
        let invalid = || PrefError::InvalidValue { key, value: raw.to_string() };
        match key {
            PrefKey::Muted => self.muted = serde_json::from_str(raw).map_err(|_| invalid())?,
            PrefKey::MatrixActive => {
                self.matrix_active = serde_json::from_str(raw).map_err(|_| invalid())?
            }
            PrefKey::MatrixSpeed => {
                let speed: i64 = serde_json::from_str(raw).map_err(|_| invalid())?;
                if !(MATRIX_SPEED_MIN as i64..=MATRIX_SPEED_MAX as i64).contains(&speed) {
                    return Err(invalid());
                }
                self.matrix_speed = speed as u8;
            }
            PrefKey::AccentColor => self.accent_color = Choice::parse(raw)?,
            PrefKey::ReduceMotion => {
                self.reduce_motion = serde_json::from_str(raw).map_err(|_| invalid())?
            }
            PrefKey::CursorStyle => self.cursor_style = Choice::parse(raw)?,
            PrefKey::FontMode => self.font_mode = Choice::parse(raw)?,
            PrefKey::BorderRadius => self.border_radius = Choice::parse(raw)?,
        }
        Ok(())
    }

    /// Human readable value, as shown in the settings list.
    pub fn display_value(&self, key: PrefKey) -> String {
        match key {
            PrefKey::Muted => String::from(if self.muted { "muted" } else { "on" }),
            PrefKey::MatrixActive => on_off(self.matrix_active),
            PrefKey::MatrixSpeed => self.matrix_speed.to_string(),
            PrefKey::AccentColor => self.accent_color.name(),
            PrefKey::ReduceMotion => on_off(self.reduce_motion),
            PrefKey::CursorStyle => self.cursor_style.name(),
            PrefKey::FontMode => self.font_mode.name(),
            PrefKey::BorderRadius => self.border_radius.name(),
        }
    }
}

fn json_bool(value: bool) -> String {
    serde_json::Value::Bool(value).to_string()
}

fn on_off(value: bool) -> String {
    String::from(if value { "on" } else { "off" })
}
