//! Engine configuration file.
//!
//! Holds the editing preferences, tag hot keys and auto-save timing. The
//! file is JSON and versioned so newer files are refused instead of being
//! half-read.

use serde::{Deserialize, Serialize};

use crate::autosave::{SaveTiming, SaveTracker};
use crate::constants::{DEFAULT_MAX_ZOOM, MIN_ZOOM, PASTE_OFFSET};
use crate::keybindings::KeyBindings;

/// Verbosity of the engine's log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Levels from quietest to noisiest.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn name(&self) -> &'static str {
        self.to_level_filter().as_str()
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        (*self).into()
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Format version written by this build. Files with a higher version are refused.
pub const CONFIG_VERSION: u32 = 1;

const CONFIG_DIR: &str = "tagcanvas";
const CONFIG_FILE: &str = "tagcanvas-config.json";

/// Engine settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub version: u32,

    /// Editing preferences
    #[serde(default)]
    pub preferences: EditorPreferences,

    /// Tag hot keys
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Auto-save timing
    #[serde(default)]
    pub autosave: AutoSaveConfig,
}

/// Editing behavior switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// A region carries at most one tag
    #[serde(default)]
    pub single_tag_mode: bool,

    /// Refuse asset switches and reviews while regions are untagged
    #[serde(default = "default_true")]
    pub enforce_tagged_regions: bool,

    /// Upper bound for the zoom scale
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    /// Step between a pasted region and its original, in source pixels
    #[serde(default = "default_paste_offset")]
    pub paste_offset: f64,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_true() -> bool {
    true
}

fn default_max_zoom() -> f64 {
    DEFAULT_MAX_ZOOM
}

fn default_paste_offset() -> f64 {
    PASTE_OFFSET
}

impl EditorPreferences {
    /// Reject numbers the canvas cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.paste_offset.is_finite() || self.paste_offset <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "paste_offset",
                value: self.paste_offset,
            });
        }
        if !self.max_zoom.is_finite() || self.max_zoom < MIN_ZOOM {
            return Err(ConfigError::InvalidValue {
                field: "max_zoom",
                value: self.max_zoom,
            });
        }
        Ok(())
    }
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            single_tag_mode: false,
            enforce_tagged_regions: default_true(),
            max_zoom: default_max_zoom(),
            paste_offset: default_paste_offset(),
            log_level: LogLevel::default(),
        }
    }
}

/// Auto-save timing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_debounce_ms() -> u64 {
    SaveTiming::DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_interval_ms() -> u64 {
    SaveTiming::DEFAULT_MIN_INTERVAL.as_millis() as u64
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl AutoSaveConfig {
    pub fn timing(&self) -> SaveTiming {
        SaveTiming::from_millis(self.debounce_ms, self.interval_ms)
    }

    /// Tracker with this timing, enabled as requested.
    pub fn tracker(&self, enabled: bool) -> SaveTracker {
        SaveTracker::new(self.timing(), enabled)
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: EditorPreferences::default(),
            keybindings: KeyBindings::default(),
            autosave: AutoSaveConfig::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a settings file, refusing versions newer than [`CONFIG_VERSION`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        config.preferences.validate()?;
        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        CONFIG_FILE
    }

    /// `<config dir>/tagcanvas/tagcanvas-config.json`, with `~/.config` when
    /// the platform has no config dir.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Read a settings file. A missing or unusable file yields None; the
    /// reason is logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("⚙️ No settings at {:?}", path);
            return None;
        }
        match Self::read_from(path) {
            Ok(config) => {
                log::info!("⚙️ Settings loaded from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("⚙️ Ignoring settings at {:?}: {}", path, e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Write the settings, creating missing directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("⚙️ Settings saved to {:?}", path);
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Settings version {file_version} is newer than supported version {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("Invalid {field} in settings: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No config directory on this platform")]
    NoConfigDir,
}
