//! Application configuration loaded from `Eddy.toml`.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration:
//!
//! ```toml
//! [window]
//! title = "Eddy"
//! width = 800
//! height = 600
//!
//! [log]
//! level = "info"
//! file = "eddy.log"
//! ```

use core::str::FromStr;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use eddy_core::SurfaceSize;
use serde::Deserialize;

/// Name of the configuration file looked up by default.
pub const CONFIG_FILE: &str = "Eddy.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or does not match the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Settings for the main window.
    pub window: WindowConfig,
    /// Settings for diagnostics.
    pub log: LogConfig,
}

/// The `[window]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Title of the surface.
    pub title: String,
    /// Width of the surface.
    pub width: u32,
    /// Height of the surface.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let size = SurfaceSize::default();
        Self {
            title: "Eddy".to_owned(),
            width: size.width,
            height: size.height,
        }
    }
}

impl WindowConfig {
    /// Returns the configured surface size.
    #[must_use]
    pub const fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// The `[log]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `EDDY_LOG` is unset.
    pub level: String,
    /// Log file; logs go to stderr when absent.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        toml::from_str(source)
    }
}

impl Config {
    /// Loads the configuration stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        source.parse().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration at `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Fails like [`Config::load`] for any problem other than a missing file.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}
