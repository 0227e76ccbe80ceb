//! Config file discovery, loading, and environment variable overlay.

use crate::{ChordmonConfig, ConfigError, OutputFormat};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Callers that need a missing `cli_path` reported check it themselves
/// (see `ChordmonConfig::load_with_sources_from`).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/chordmon/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("chordmon/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("chordmon.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// What a single config file sets. Absent keys stay `None` and leave the
/// running config alone.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    display: DisplayFile,
    telemetry: TelemetryFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DisplayFile {
    format: Option<OutputFormat>,
    show_notes: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TelemetryFile {
    log_level: Option<String>,
}

/// Load a TOML file onto `config`.
pub fn load_from_file(config: &mut ChordmonConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Apply the keys present in a TOML string onto `config`.
pub(crate) fn apply_toml(
    config: &mut ChordmonConfig,
    contents: &str,
    path: &Path,
) -> Result<(), ConfigError> {
    let file: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(format) = file.display.format {
        config.display.format = format;
    }
    if let Some(show_notes) = file.display.show_notes {
        config.display.show_notes = show_notes;
    }
    if let Some(log_level) = file.telemetry.log_level {
        config.telemetry.log_level = log_level;
    }

    Ok(())
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut ChordmonConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, env::vars());
}

/// Apply overrides from an explicit set of variables.
pub fn apply_overrides_from<I>(config: &mut ChordmonConfig, sources: &mut ConfigSources, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut rust_log = None;

    for (key, value) in vars {
        match key.as_str() {
            "CHORDMON_FORMAT" => {
                if let Ok(format) = value.parse::<OutputFormat>() {
                    config.display.format = format;
                    sources.env_overrides.push(key);
                }
            }
            "CHORDMON_SHOW_NOTES" => {
                if let Some(show) = parse_bool(&value) {
                    config.display.show_notes = show;
                    sources.env_overrides.push(key);
                }
            }
            "CHORDMON_LOG_LEVEL" => {
                config.telemetry.log_level = value;
                sources.env_overrides.push(key);
            }
            "RUST_LOG" => rust_log = Some(value),
            _ => {}
        }
    }

    // RUST_LOG wins over CHORDMON_LOG_LEVEL regardless of iteration order
    if let Some(v) = rust_log {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
