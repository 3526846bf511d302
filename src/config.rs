//! Build configuration.
//!
//! Options are read from an optional `config.toml`, then overridden by
//! command-line flags. Everything has a default, so an empty (or missing)
//! file is a valid configuration.
//!
//! ## Configuration Options
//!
//! ```toml
//! output = "dist"                # Output directory
//! theme = "classic"              # Theme name, looked up as `theme-<name>` in theme_dirs
//! theme_dirs = ["themes"]        # Directories searched for named themes
//! # theme_path = "my-theme"      # Explicit theme directory (wins over `theme`)
//! # theme_style = "custom.css"   # Extra stylesheet appended to theme.css
//! # theme_settings = "theme.json" # JSON settings exposed to templates
//! # seo_location = "https://photos.example.com/"  # Enables sitemap.xml and robots.txt
//!
//! [render]
//! max_workers = 4                # Parallel page renders (omit for auto = CPU cores)
//!
//! [gallery]                      # Free-form values passed to every template
//! title = "Photo Gallery"
//! footer = "All rights reserved"
//! ```
//!
//! Unknown keys are rejected to catch typos early. The `[gallery]` table is
//! the exception: its keys are forwarded to templates verbatim, next to the
//! options above under the same `gallery` key. A `[gallery]` key may not
//! reuse an option name (or `home`), see [`RESERVED_GALLERY_KEYS`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Names templates already see under `gallery`, unavailable to `[gallery]`.
pub const RESERVED_GALLERY_KEYS: &[&str] = &[
    "output",
    "theme",
    "theme_path",
    "theme_style",
    "theme_settings",
    "seo_location",
    "theme_dirs",
    "render",
    "home",
];

/// Options for one site build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Output directory for pages and assets.
    pub output: PathBuf,
    /// Theme name, resolved as `theme-<name>` inside [`theme_dirs`](Self::theme_dirs).
    pub theme: String,
    /// Explicit theme directory. Takes precedence over `theme`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_path: Option<PathBuf>,
    /// Custom stylesheet appended after the theme's own styles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_style: Option<PathBuf>,
    /// JSON file with theme settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_settings: Option<PathBuf>,
    /// Public base URL of the site. Enables sitemap.xml and robots.txt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_location: Option<String>,
    /// Directories searched, in order, for named themes.
    pub theme_dirs: Vec<PathBuf>,
    /// Parallel rendering settings.
    pub render: RenderConfig,
    /// Free-form values forwarded to templates.
    #[serde(skip_serializing)]
    pub gallery: BTreeMap<String, serde_json::Value>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            theme: "classic".to_string(),
            theme_path: None,
            theme_style: None,
            theme_settings: None,
            seo_location: None,
            theme_dirs: vec![PathBuf::from("themes")],
            render: RenderConfig::default(),
            gallery: BTreeMap::new(),
        }
    }
}

impl BuildOptions {
    /// Validate option values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.theme_path.is_none() && self.theme.trim().is_empty() {
            return Err(ConfigError::Validation(
                "theme must not be empty unless theme_path is set".into(),
            ));
        }
        if let Some(key) = self
            .gallery
            .keys()
            .find(|k| RESERVED_GALLERY_KEYS.contains(&k.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "[gallery] key {key:?} collides with a built-in template value"
            )));
        }
        if self.render.max_workers == Some(0) {
            return Err(ConfigError::Validation(
                "render.max_workers must be at least 1".into(),
            ));
        }
        match self.seo_location.as_deref() {
            Some(location)
                if !location.is_empty()
                    && !(location.starts_with("http://") || location.starts_with("https://")) =>
            {
                Err(ConfigError::Validation(format!(
                    "seo_location must be an absolute http(s) URL, got {location:?}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if overrides.theme_path.is_some() {
            self.theme_path = overrides.theme_path;
        }
        if overrides.theme_style.is_some() {
            self.theme_style = overrides.theme_style;
        }
        if overrides.theme_settings.is_some() {
            self.theme_settings = overrides.theme_settings;
        }
        if overrides.seo_location.is_some() {
            self.seo_location = overrides.seo_location;
        }
    }
}

/// Values that replace file configuration when present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub theme: Option<String>,
    pub theme_path: Option<PathBuf>,
    pub theme_style: Option<PathBuf>,
    pub theme_settings: Option<PathBuf>,
    pub seo_location: Option<String>,
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Maximum number of pages rendered in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &RenderConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load build options from a TOML file.
///
/// Returns defaults when `path` is `None`. A path that was given explicitly
/// must exist.
pub fn load_config(path: Option<&Path>) -> Result<BuildOptions, ConfigError> {
    let Some(path) = path else {
        return Ok(BuildOptions::default());
    };
    let content = fs::read_to_string(path)?;
    let options: BuildOptions = toml::from_str(&content)?;
    options.validate()?;
    Ok(options)
}

/// A documented stock `config.toml`.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-site configuration
# All options are optional. Values shown are the defaults.
# Unknown keys will cause an error.

# Directory the site is written to.
output = "dist"

# Theme name. Looked up as a `theme-<name>` directory inside theme_dirs.
theme = "classic"

# Directories searched, in order, for named themes.
theme_dirs = ["themes"]

# Use a theme directory directly instead of looking it up by name.
# theme_path = "path/to/my-theme"

# Extra stylesheet appended to the theme stylesheet (theme.css).
# theme_style = "custom.css"

# JSON file whose content is available to templates as `settings`.
# theme_settings = "theme-settings.json"

# Public URL of the published site. When set, sitemap.xml and robots.txt
# are written to the output directory.
# seo_location = "https://photos.example.com/"

[render]
# Maximum pages rendered in parallel. Omit to use every CPU core.
# max_workers = 4

[gallery]
# Anything here is passed through to templates under `gallery`.
# Option names above (output, theme, ...) and `home` are reserved.
# title = "Photo Gallery"
# footer = "All rights reserved"
"##
}
