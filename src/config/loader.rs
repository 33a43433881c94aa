//! Configuration file loading with precedence handling.

use crate::feed::{PageSize, SentinelConfig};
use crate::layout::ColumnBreakpoints;
use crate::model::Resolution;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GALLERY_FEED_CONFIG";

/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "GALLERY_FEED_PAGE_SIZE";

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

    /// A setting parsed but is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting name as written in the file or environment.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/gallery-feed/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Items requested per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Sentinel lookahead margin in pixels.
    #[serde(default)]
    pub sentinel_margin_px: Option<f64>,

    /// Fraction of the anchor that must be visible.
    #[serde(default)]
    pub sentinel_threshold: Option<f64>,

    /// Preferred tile resource variant ("original", "4k", "1080p", "preview").
    #[serde(default)]
    pub resolution: Option<Resolution>,

    /// Ascending viewport widths at which another column is added.
    #[serde(default)]
    pub breakpoints: Option<Vec<u32>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
/// Every field is already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Items requested per page.
    pub page_size: PageSize,
    /// Anchor margin and visibility threshold.
    pub sentinel: SentinelConfig,
    /// Resolution tiles ask for.
    pub resolution: Resolution,
    /// Viewport widths at which a column is added.
    pub breakpoints: ColumnBreakpoints,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            sentinel: SentinelConfig::default(),
            resolution: Resolution::default(),
            breakpoints: ColumnBreakpoints::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/gallery-feed/gallery-feed.log` on Linux, or the
/// platform state directory elsewhere. Falls back to the current directory
/// when no state directory is known.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("gallery-feed").join("gallery-feed.log"),
        None => PathBuf::from("gallery-feed.log"),
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
/// Returns `None` if the platform config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gallery-feed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `GALLERY_FEED_CONFIG` environment variable
/// 3. Default path `~/.config/gallery-feed/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed,
/// or if `GALLERY_FEED_CONFIG` is not valid unicode.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()))
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a zero page size, a negative or
/// non-finite margin, a threshold outside `0.0..=1.0`, or breakpoints that
/// are not strictly ascending.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let page_size = match config.page_size {
        Some(size) => PageSize::new(size).map_err(|e| ConfigError::invalid("page_size", e))?,
        None => defaults.page_size,
    };

    let margin_px = config
        .sentinel_margin_px
        .unwrap_or(defaults.sentinel.margin_px);
    if !margin_px.is_finite() || margin_px < 0.0 {
        return Err(ConfigError::invalid(
            "sentinel_margin_px",
            format!("must be a non-negative number, got {margin_px}"),
        ));
    }

    let threshold = config
        .sentinel_threshold
        .unwrap_or(defaults.sentinel.threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::invalid(
            "sentinel_threshold",
            format!("must be within 0.0..=1.0, got {threshold}"),
        ));
    }

    let breakpoints = match config.breakpoints {
        Some(widths) => {
            ColumnBreakpoints::new(widths).map_err(|e| ConfigError::invalid("breakpoints", e))?
        }
        None => defaults.breakpoints,
    };

    Ok(ResolvedConfig {
        page_size,
        sentinel: SentinelConfig {
            margin_px,
            threshold,
        },
        resolution: config.resolution.unwrap_or(defaults.resolution),
        breakpoints,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `GALLERY_FEED_PAGE_SIZE`: Override page size
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the variable is set but is not a
/// positive integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
        let size: usize = raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(PAGE_SIZE_ENV, format!("'{raw}': {e}")))?;
        config.page_size = PageSize::new(size).map_err(|e| ConfigError::invalid(PAGE_SIZE_ENV, e))?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    page_size_override: Option<PageSize>,
    resolution_override: Option<Resolution>,
) -> ResolvedConfig {
    if let Some(page_size) = page_size_override {
        config.page_size = page_size;
    }

    if let Some(resolution) = resolution_override {
        config.resolution = resolution;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
