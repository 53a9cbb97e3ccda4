//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars.
//!
//! Config lives at `~/.rosterget/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub max_log_lines: Option<usize>,
    pub tick_rate_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "rosterget.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
pub const DEFAULT_MAX_LOG_LINES: usize = 500;
pub const DEFAULT_TICK_RATE_MS: u64 = 80;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub max_log_lines: usize,
    pub tick_rate_ms: u64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&RosterConfig::default())
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.rosterget/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rosterget").join("config.toml"))
}

/// Load config from `~/.rosterget/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RosterConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RosterConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RosterConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<RosterConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RosterConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RosterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# rosterget configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars.

# [general]
# log_file = "rosterget.log"          # Or set ROSTERGET_LOG_FILE
# log_level = "info"                  # off, error, warn, info, debug, trace (ROSTERGET_LOG_LEVEL)

# [ui]
# max_log_lines = 500                 # Activity log lines kept on screen
# tick_rate_ms = 80                   # Redraw interval while the loading spinner runs
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars.
pub fn resolve(config: &RosterConfig) -> ResolvedConfig {
    // Log file: env → config → default
    let log_file = std::env::var("ROSTERGET_LOG_FILE")
        .ok()
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    // Log level: env → config → default; unparseable values fall through
    let log_level = std::env::var("ROSTERGET_LOG_LEVEL")
        .ok()
        .and_then(|s| parse_level(&s))
        .or_else(|| config.general.log_level.as_deref().and_then(parse_level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        log_file: PathBuf::from(log_file),
        log_level,
        max_log_lines: config
            .ui
            .max_log_lines
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_LOG_LINES),
        tick_rate_ms: config.ui.tick_rate_ms.unwrap_or(DEFAULT_TICK_RATE_MS).max(10),
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().parse::<LevelFilter>() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Ignoring unknown log level '{}'", s);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = RosterConfig::default();
        assert!(config.general.log_file.is_none());
        assert!(config.ui.max_log_lines.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = RosterConfig {
            general: GeneralConfig {
                log_file: Some("custom.log".to_string()),
                log_level: Some("debug".to_string()),
            },
            ui: UiConfig {
                max_log_lines: Some(50),
                tick_rate_ms: Some(120),
            },
        };
        let resolved = resolve(&config);
        assert_eq!(resolved.max_log_lines, 50);
        assert_eq!(resolved.tick_rate_ms, 120);
    }

    #[test]
    fn test_resolve_rejects_zero_log_lines() {
        let config = RosterConfig {
            ui: UiConfig {
                max_log_lines: Some(0),
                tick_rate_ms: Some(1),
            },
            ..Default::default()
        };
        let resolved = resolve(&config);
        assert_eq!(resolved.max_log_lines, DEFAULT_MAX_LOG_LINES);
        assert_eq!(resolved.tick_rate_ms, 10);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[ui]
max_log_lines = 42
"#;
        let config: RosterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ui.max_log_lines, Some(42));
        assert!(config.ui.tick_rate_ms.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.general.log_file.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[general]"));

        // The generated file is all comments and parses back to defaults
        let reparsed = load_config_from(&path).unwrap();
        assert!(reparsed.ui.max_log_lines.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui]\nmax_log_lines = \"lots\"\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
