//! Theme settings.
//!
//! Themes can expose knobs (accent colors, grid density, footer text) through
//! an optional JSON file. The file is loaded once per build and made
//! available to every page template under the `settings` key. Its content is
//! not interpreted here beyond requiring a top-level object.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Theme settings as a plain key/value mapping.
pub type ThemeSettings = Map<String, Value>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read theme settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON theme settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Theme settings file {0} must contain a JSON object")]
    NotAnObject(PathBuf),
}

/// Load theme settings, or an empty mapping when no file is configured.
pub fn load_theme_settings(path: Option<&Path>) -> Result<ThemeSettings, SettingsError> {
    let Some(path) = path else {
        return Ok(ThemeSettings::new());
    };
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SettingsError::NotAnObject(path.to_path_buf())),
    }
}
