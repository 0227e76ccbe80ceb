//! Configuration loading for chordmon.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/chordmon/config.toml` (system)
//! 2. `~/.config/chordmon/config.toml` (user)
//! 3. `./chordmon.toml` (local override, or the `--config` path)
//! 4. Environment variables (`CHORDMON_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [display]
//! format = "text"
//! show_notes = true
//!
//! [telemetry]
//! log_level = "warn"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{DisplayConfig, OutputFormat, TelemetryConfig};

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file {path} does not exist")]
    NotFound { path: PathBuf },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to render config as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Complete chordmon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ChordmonConfig {
    pub display: DisplayConfig,
    pub telemetry: TelemetryConfig,
}

impl ChordmonConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./chordmon.toml` override. System and user configs still load first.
    /// A `config_path` that does not exist is an error.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        let mut sources = ConfigSources::default();
        let mut config = ChordmonConfig::default();

        // Each file only touches the keys it sets
        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let body = toml::to_string(self)?;
        Ok(format!("# chordmon configuration\n\n{body}"))
    }
}
