//! Theme asset providers.
//!
//! A site is rendered from two asset layers:
//!
//! 1. the **base layer** ([`BaseAssets`](crate::base::BaseAssets)), embedded in
//!    the binary: a CSS reset, a small JS helper, and template filters;
//! 2. the **theme layer** ([`Theme`]), a directory chosen by name or path.
//!
//! Both implement [`AssetProvider`]. Only the theme renders pages, through
//! [`PageRenderer`].
//!
//! ## Theme Directory Layout
//!
//! ```text
//! themes/theme-classic/
//! ├── album.html          # Page template (required), tera syntax
//! ├── theme.css           # Theme styles (optional) → public/theme.css
//! ├── partials/           # Templates usable via {% include "partials/..." %}
//! │   └── breadcrumbs.html
//! └── public/             # Copied verbatim to <output>/public/
//!     └── ...
//! ```
//!
//! Named themes are looked up as `theme-<name>` inside each configured theme
//! directory, first match wins.

use crate::album::{is_contained, page_file};
use crate::base;
use crate::context::TemplateContext;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tera::Tera;
use thiserror::Error;
use walkdir::WalkDir;

/// Template every theme must provide.
pub const ALBUM_TEMPLATE: &str = "album.html";

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {}", error_chain(.0))]
    Template(#[from] tera::Error),
    #[error("Theme {0} has no album.html template")]
    MissingTemplate(PathBuf),
    #[error("Custom stylesheet not found: {0}")]
    MissingStylesheet(PathBuf),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Theme templates used before prepare()")]
    NotPrepared,
    #[error("Page {0:?} would be written outside the output directory")]
    PageOutsideOutput(String),
}

/// Tera reports the useful part of an error in its source chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Something that writes static assets into the output directory.
///
/// Providers are shared by reference across rayon workers, hence `Sync`.
pub trait AssetProvider: Sync {
    /// Write this layer's assets. Called once per build, before any page renders.
    fn prepare(&self) -> Result<(), ThemeError>;
}

/// An asset layer that can also render album pages.
pub trait PageRenderer: AssetProvider {
    /// Render one page to `page` (an album path, see [`page_file`]).
    fn render(&self, page: &str, context: &TemplateContext<'_>) -> Result<(), ThemeError>;
}

/// Per-layer settings.
#[derive(Debug, Clone)]
pub struct ThemeOptions {
    /// File name of the bundled stylesheet under `public/`.
    pub stylesheet_name: String,
    /// Extra stylesheet appended after the theme's own `theme.css`.
    pub custom_styles_path: Option<PathBuf>,
}

/// A theme loaded from a directory.
pub struct Theme {
    dir: PathBuf,
    dest: PathBuf,
    options: ThemeOptions,
    templates: OnceLock<Tera>,
}

impl Theme {
    pub fn new(dir: impl Into<PathBuf>, dest: impl Into<PathBuf>, options: ThemeOptions) -> Self {
        Self {
            dir: dir.into(),
            dest: dest.into(),
            options,
            templates: OnceLock::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_templates(&self) -> Result<Tera, ThemeError> {
        let album = self.dir.join(ALBUM_TEMPLATE);
        if !album.is_file() {
            return Err(ThemeError::MissingTemplate(self.dir.clone()));
        }

        let mut files = vec![(album, Some(ALBUM_TEMPLATE.to_string()))];
        let partials = self.dir.join("partials");
        if partials.is_dir() {
            for entry in WalkDir::new(&partials).sort_by_file_name() {
                let entry = entry?;
                let path = entry.path();
                if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "html") {
                    continue;
                }
                let name = path
                    .strip_prefix(&self.dir)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .replace('\\', "/");
                files.push((path.to_path_buf(), Some(name)));
            }
        }

        let mut tera = Tera::default();
        base::register_helpers(&mut tera);
        tera.add_template_files(files)?;
        tracing::debug!(theme = %self.dir.display(), "Loaded theme templates");
        Ok(tera)
    }

    fn copy_public(&self) -> Result<usize, ThemeError> {
        let public = self.dir.join("public");
        if !public.is_dir() {
            return Ok(0);
        }
        let target_root = self.dest.join("public");
        let mut copied = 0;
        for entry in WalkDir::new(&public) {
            let entry = entry?;
            let relative = entry.path().strip_prefix(&public).unwrap_or(entry.path());
            let target = target_root.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    fn write_stylesheet(&self) -> Result<(), ThemeError> {
        let mut css = String::new();
        let theme_css = self.dir.join("theme.css");
        if theme_css.is_file() {
            css.push_str(&fs::read_to_string(&theme_css)?);
        }
        if let Some(custom) = &self.options.custom_styles_path {
            if !custom.is_file() {
                return Err(ThemeError::MissingStylesheet(custom.clone()));
            }
            if !css.is_empty() && !css.ends_with('\n') {
                css.push('\n');
            }
            css.push_str(&fs::read_to_string(custom)?);
        }
        let public = self.dest.join("public");
        fs::create_dir_all(&public)?;
        fs::write(public.join(&self.options.stylesheet_name), css)?;
        Ok(())
    }
}

impl AssetProvider for Theme {
    fn prepare(&self) -> Result<(), ThemeError> {
        if self.templates.get().is_none() {
            let tera = self.load_templates()?;
            // A concurrent prepare() may have won; either copy is equivalent
            let _ = self.templates.set(tera);
        }
        let copied = self.copy_public()?;
        self.write_stylesheet()?;
        tracing::debug!(theme = %self.dir.display(), copied, "Theme assets ready");
        Ok(())
    }
}

impl PageRenderer for Theme {
    fn render(&self, page: &str, context: &TemplateContext<'_>) -> Result<(), ThemeError> {
        let file = page_file(page);
        if !is_contained(&file) {
            return Err(ThemeError::PageOutsideOutput(page.to_string()));
        }
        let tera = self.templates.get().ok_or(ThemeError::NotPrepared)?;
        let data = tera::Context::from_serialize(context)?;
        let html = tera.render(ALBUM_TEMPLATE, &data)?;

        let target = self.dest.join(file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, html)?;
        Ok(())
    }
}

/// Find a named theme: the first `<dir>/theme-<name>` directory that exists.
pub fn find_theme(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join(format!("theme-{name}")))
        .find(|candidate| candidate.is_dir())
}
