//! Configuration file loading with precedence handling.

use crate::view_state::{DisplayOptions, DEFAULT_WIDTH_CACHE_CAPACITY};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "LINEVIEW_CONFIG";

/// Environment variable overriding the style description.
pub const STYLE_ENV_VAR: &str = "LINEVIEW_STYLE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/lineview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Style description, e.g. `"font-size: 12px"`.
    #[serde(default)]
    pub style: Option<String>,

    /// Line wrapping enabled.
    #[serde(default)]
    pub line_wrap: Option<bool>,

    /// Reserve room for the left margin.
    #[serde(default)]
    pub show_left_margin: Option<bool>,

    /// Left margin width in pixels.
    #[serde(default)]
    pub margin_width: Option<f64>,

    /// Maximum number of cached line widths.
    #[serde(default)]
    pub width_cache_capacity: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Style description.
    pub style: String,
    /// Line wrapping.
    pub line_wrap: bool,
    /// Reserve room for the left margin.
    pub show_left_margin: bool,
    /// Left margin width in pixels.
    pub margin_width: f64,
    /// Maximum number of cached line widths.
    pub width_cache_capacity: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            style: "font-size: 10px".to_string(),
            line_wrap: false,
            show_left_margin: true,
            margin_width: 24.0,
            width_cache_capacity: DEFAULT_WIDTH_CACHE_CAPACITY,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Options for a [`LineDisplay`](crate::view_state::LineDisplay).
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_left_margin: self.show_left_margin,
            margin_width: self.margin_width,
            width_cache_capacity: self.width_cache_capacity,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/lineview/lineview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("lineview").join("lineview.log")
    } else {
        PathBuf::from("lineview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/lineview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lineview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LINEVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/lineview/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(config_path: Option<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV_VAR) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `LINEVIEW_STYLE`: Override style
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(style) = std::env::var(STYLE_ENV_VAR) {
        config.style = style;
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        style: config.style.unwrap_or(defaults.style),
        line_wrap: config.line_wrap.unwrap_or(defaults.line_wrap),
        show_left_margin: config.show_left_margin.unwrap_or(defaults.show_left_margin),
        margin_width: config.margin_width.unwrap_or(defaults.margin_width),
        width_cache_capacity: config
            .width_cache_capacity
            .unwrap_or(defaults.width_cache_capacity),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    style_override: Option<String>,
    wrap_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(style) = style_override {
        config.style = style;
    }

    if let Some(wrap) = wrap_override {
        config.line_wrap = wrap;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
