//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DEVCONSOLE_CONFIG";

/// Environment variable overriding follow mode.
pub const FOLLOW_ENV_VAR: &str = "DEVCONSOLE_FOLLOW";

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
/// Corresponds to `~/.config/devconsole/config.toml`.
///
/// ```toml
/// chunk_size = 500
/// throttle_ms = 33
/// min_tolerance = 40
/// max_tolerance = 200
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Queued console calls executed per drain.
    pub chunk_size: Option<usize>,

    /// Delay before the first drain of an idle period.
    pub debounce_ms: Option<u64>,

    /// Minimum interval between renders.
    pub throttle_ms: Option<u64>,

    /// Prefetch floor, in rows.
    pub min_tolerance: Option<usize>,

    /// Prefetch cap, in rows.
    pub max_tolerance: Option<usize>,

    /// Prefetch used after a scroll pause.
    pub stalled_tolerance: Option<usize>,

    /// Scroll sample gap that counts as a pause.
    pub stall_threshold_ms: Option<u64>,

    /// Rows of prefetch per row/ms of scroll speed.
    pub velocity_factor: Option<f64>,

    /// Symmetric prefetch for renders not caused by scrolling.
    pub default_tolerance: Option<usize>,

    /// Auto-follow overshoot, in percent of the content height.
    pub bottom_overshoot_percent: Option<u32>,

    /// Path to log file for tracing output.
    pub log_file_path: Option<PathBuf>,

    /// Keep reading the input file as it grows.
    pub follow: Option<bool>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Queued console calls executed per drain.
    pub chunk_size: usize,
    /// Delay before the first drain of an idle period.
    pub debounce_ms: u64,
    /// Minimum interval between renders.
    pub throttle_ms: u64,
    /// Prefetch floor, in rows.
    pub min_tolerance: usize,
    /// Prefetch cap, in rows.
    pub max_tolerance: usize,
    /// Prefetch used after a scroll pause.
    pub stalled_tolerance: usize,
    /// Scroll sample gap that counts as a pause.
    pub stall_threshold_ms: u64,
    /// Rows of prefetch per row/ms of scroll speed.
    pub velocity_factor: f64,
    /// Symmetric prefetch for renders not caused by scrolling.
    pub default_tolerance: usize,
    /// Auto-follow overshoot, in percent of the content height.
    pub bottom_overshoot_percent: u32,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Keep reading the input file as it grows.
    pub follow: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            debounce_ms: 0,
            throttle_ms: 16,
            min_tolerance: 600,
            max_tolerance: 2000,
            stalled_tolerance: 1200,
            stall_threshold_ms: 200,
            velocity_factor: 100.0,
            default_tolerance: 800,
            bottom_overshoot_percent: 150,
            log_file_path: default_log_path(),
            follow: false,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/devconsole/devconsole.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("devconsole").join("devconsole.log")
    } else {
        PathBuf::from("devconsole.log")
    }
}

/// Load one configuration file.
///
/// A file that does not exist yields `Ok(None)`; the caller falls back to
/// defaults.
///
/// # Errors
///
/// Returns `ReadError` for any other I/O failure and `ParseError` for
/// malformed TOML or unknown keys.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path,
                reason: e.to_string(),
            })
        }
    };

    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigError::ParseError {
            path,
            reason: e.to_string(),
        })
}

/// Resolve default config file path.
///
/// Returns `~/.config/devconsole/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if the config directory is unknown.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devconsole").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DEVCONSOLE_CONFIG` environment variable
/// 3. Default path `~/.config/devconsole/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV_VAR) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!(
                "{CONFIG_ENV_VAR} is set but empty"
            )));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `DEVCONSOLE_FOLLOW`: `1`/`true`/`yes` or `0`/`false`/`no`. Other
///   values are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(FOLLOW_ENV_VAR) {
        if let Some(follow) = parse_flag(&value) {
            config.follow = follow;
        }
    }

    config
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
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
        chunk_size: config.chunk_size.unwrap_or(defaults.chunk_size),
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        throttle_ms: config.throttle_ms.unwrap_or(defaults.throttle_ms),
        min_tolerance: config.min_tolerance.unwrap_or(defaults.min_tolerance),
        max_tolerance: config.max_tolerance.unwrap_or(defaults.max_tolerance),
        stalled_tolerance: config
            .stalled_tolerance
            .unwrap_or(defaults.stalled_tolerance),
        stall_threshold_ms: config
            .stall_threshold_ms
            .unwrap_or(defaults.stall_threshold_ms),
        velocity_factor: config.velocity_factor.unwrap_or(defaults.velocity_factor),
        default_tolerance: config
            .default_tolerance
            .unwrap_or(defaults.default_tolerance),
        bottom_overshoot_percent: config
            .bottom_overshoot_percent
            .unwrap_or(defaults.bottom_overshoot_percent),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        follow: config.follow.unwrap_or(defaults.follow),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    follow_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(follow) = follow_override {
        config.follow = follow;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
