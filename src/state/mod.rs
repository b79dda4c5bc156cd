pub mod dashboard;
pub mod matrix;
pub mod navbar;
pub mod notification;
pub mod palette;
pub mod ui;

pub use dashboard::Dashboard;
pub use matrix::MatrixRain;
pub use navbar::NavbarState;
pub use notification::NotificationState;
pub use palette::{CommandAction, CommandPalette};
pub use ui::{AppMode, UiState};

use std::path::PathBuf;
use thiserror::Error;

use crate::prefs::PrefKey;

/// Configuration for the application. Defaults, overridden from the
/// environment and the first command-line argument.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Preference file. `None` keeps preferences for this session only.
    pub prefs_path: Option<PathBuf>,
    /// Values from `FOLIO_<STORAGE_KEY>` variables, applied after load.
    pub pref_overrides: Vec<(PrefKey, String)>,
    pub log_path: PathBuf,
    pub log_filter: String,
    pub probe_addr: String,
    /// Shift+M toggles matrix mode in addition to the key sequence.
    pub matrix_chord: bool,
    pub start_section: Option<String>,
    pub tick_rate_ms: u64,
    pub notification_timeout_ms: u64,
    pub scroll_lines_per_page: u16,
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = home_dir();
        Self {
            prefs_path: Some(home.join(".folio_prefs.json")),
            pref_overrides: Vec::new(),
            log_path: home.join(".folio.log"),
            log_filter: "info".to_string(),
            probe_addr: "1.1.1.1:443".to_string(),
            matrix_chord: true,
            start_section: None,
            tick_rate_ms: 50,
            notification_timeout_ms: 2500,
            scroll_lines_per_page: 10,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), std::env::args().nth(1))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, arg: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("FOLIO_PREFS") {
            config.prefs_path = (!path.trim().is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(path) = lookup("FOLIO_LOG_FILE") {
            config.log_path = PathBuf::from(path);
        }
        if let Some(filter) = lookup("FOLIO_LOG") {
            config.log_filter = filter;
        }
        if let Some(addr) = arg.or_else(|| lookup("FOLIO_PROBE_ADDR")) {
            config.probe_addr = addr;
        }
        if let Some(flag) = lookup("FOLIO_MATRIX_CHORD") {
            config.matrix_chord = !matches!(flag.trim(), "0" | "false" | "off" | "no");
        }
        config.start_section = lookup("FOLIO_SECTION").filter(|s| !s.trim().is_empty());
        config.pref_overrides = PrefKey::ALL
            .into_iter()
            .filter_map(|key| {
                let var = format!("FOLIO_{}", key.storage_key().to_uppercase());
                lookup(&var).map(|raw| (key, raw))
            })
            .collect();
        config
    }

    pub fn ticks_for_ms(&self, ms: u64) -> u64 {
        ms.div_ceil(self.tick_rate_ms.max(1))
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type AppResult<T> = Result<T, AppError>;
