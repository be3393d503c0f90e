//! Configuration file support for pixdesk.
//!
//! This module provides serialization and deserialization of workspace settings:
//! where the analysis service lives, how the viewport behaves and how long
//! transient UI surfaces stay around.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{generate, server, timing, zoom};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Workspace configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Analysis service endpoints
    #[serde(default)]
    pub server: ServerConfig,

    /// Viewport zoom and pan behaviour
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Durations of transient UI surfaces
    #[serde(default)]
    pub timing: TimingConfig,

    /// Dataset generation limits
    #[serde(default)]
    pub generate: GenerateConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Analysis service section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL, endpoint paths are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,

    #[serde(default = "default_generate_path")]
    pub generate_path: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    server::DEFAULT_BASE_URL.to_string()
}

fn default_analyze_path() -> String {
    server::ANALYZE_PATH.to_string()
}

fn default_generate_path() -> String {
    server::GENERATE_PATH.to_string()
}

fn default_timeout_ms() -> u64 {
    server::TIMEOUT_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            analyze_path: default_analyze_path(),
            generate_path: default_generate_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Viewport section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_min_percent")]
    pub min_percent: u32,

    #[serde(default = "default_max_percent")]
    pub max_percent: u32,

    #[serde(default = "default_step_percent")]
    pub step_percent: u32,

    /// Multiplier applied to pointer movement while dragging.
    /// 1.0 keeps the image locked to the pointer.
    #[serde(default = "default_drag_damping")]
    pub drag_damping: f32,
}

fn default_min_percent() -> u32 {
    zoom::MIN_PERCENT
}

fn default_max_percent() -> u32 {
    zoom::MAX_PERCENT
}

fn default_step_percent() -> u32 {
    zoom::STEP_PERCENT
}

fn default_drag_damping() -> f32 {
    zoom::DRAG_DAMPING
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_percent: default_min_percent(),
            max_percent: default_max_percent(),
            step_percent: default_step_percent(),
            drag_damping: default_drag_damping(),
        }
    }
}

/// Timer section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Inline notice auto-hide delay
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u64,

    /// Dialog close animation length
    #[serde(default = "default_dialog_close_ms")]
    pub dialog_close_ms: u64,
}

fn default_notice_ms() -> u64 {
    timing::NOTICE_MS
}

fn default_dialog_close_ms() -> u64 {
    timing::DIALOG_CLOSE_MS
}

impl TimingConfig {
    pub fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    pub fn dialog_close(&self) -> Duration {
        Duration::from_millis(self.dialog_close_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            notice_ms: default_notice_ms(),
            dialog_close_ms: default_dialog_close_ms(),
        }
    }
}

/// Dataset generation section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_min_count")]
    pub min_count: u32,

    #[serde(default = "default_max_count")]
    pub max_count: u32,

    /// Count shown when the form is reset
    #[serde(default = "default_count")]
    pub default_count: u32,
}

fn default_min_count() -> u32 {
    generate::MIN_COUNT
}

fn default_max_count() -> u32 {
    generate::MAX_COUNT
}

fn default_count() -> u32 {
    generate::DEFAULT_COUNT
}

impl GenerateConfig {
    pub fn accepts(&self, count: u32) -> bool {
        (self.min_count..=self.max_count).contains(&count)
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            min_count: default_min_count(),
            max_count: default_max_count(),
            default_count: default_count(),
        }
    }
}

impl WorkspaceConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            viewport: ViewportConfig::default(),
            timing: TimingConfig::default(),
            generate: GenerateConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if config.viewport.min_percent == 0
            || config.viewport.min_percent > config.viewport.max_percent
            || config.viewport.step_percent == 0
        {
            return Err(ConfigError::Invalid(format!(
                "viewport zoom range {}..={} step {}",
                config.viewport.min_percent,
                config.viewport.max_percent,
                config.viewport.step_percent
            )));
        }

        if config.generate.min_count > config.generate.max_count {
            return Err(ConfigError::Invalid(format!(
                "generate count range {}..={}",
                config.generate.min_count, config.generate.max_count
            )));
        }

        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "pixdesk-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("pixdesk").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("pixdesk")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the given path, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<std::path::PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
