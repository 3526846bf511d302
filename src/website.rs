//! Site build orchestration.
//!
//! Turns an album tree and a theme into a website:
//!
//! ```text
//! resolve theme ─► load settings ─► build context ─► enumerate pages
//!                                                        │
//!            ┌───────────────────────────────────────────┤
//!            ▼                                           ▼
//!     SEO emission (own thread)       prepare(base) ─► prepare(theme) ─► render pages (rayon)
//! ```
//!
//! ## Ordering
//!
//! The two asset layers are prepared strictly in sequence, and no page is
//! rendered before both succeed. A failing layer aborts the build on the spot.
//! Pages render in parallel; a failing page does not stop the others, every
//! page is attempted and the first failure (in tree order) is reported once
//! all of them settled. Pages already written are left in place.
//!
//! ## SEO
//!
//! `sitemap.xml` and `robots.txt` are produced on a separate thread that the
//! pipeline does not wait for. It starts once the build is known to be
//! runnable (theme, settings and album tree are valid) and completes
//! regardless of how rendering goes. [`Build::seo`] lets callers join it.

use crate::album::{self, Album, AlbumError};
use crate::base::BaseAssets;
use crate::config::BuildOptions;
use crate::context::TemplateContext;
use crate::seo::{SeoError, SeoHandle, SeoOutcome, spawn_seo};
use crate::settings::{SettingsError, load_theme_settings};
use crate::tasks::{RenderUnit, build_tasks};
use crate::theme::{AssetProvider, PageRenderer, Theme, ThemeError, ThemeOptions, find_theme};
use rayon::prelude::*;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Stylesheet written by the base layer.
pub const BASE_STYLESHEET: &str = "core.css";
/// Stylesheet written by the theme layer.
pub const THEME_STYLESHEET: &str = "theme.css";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Could not find a theme called {name:?} (looked for theme-{name} in {})", list_dirs(searched))]
    ThemeNotFound { name: String, searched: Vec<PathBuf> },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Invalid album tree: {0}")]
    Album(#[from] AlbumError),
    #[error("Failed to prepare {layer} assets: {source}")]
    AssetPreparation {
        layer: Layer,
        #[source]
        source: ThemeError,
    },
    #[error("Failed to render {page}: {source}")]
    Render {
        page: String,
        #[source]
        source: ThemeError,
    },
    #[error("Failed to write sitemap: {0}")]
    Seo(#[from] SeoError),
}

fn list_dirs(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "no theme directories".to_string();
    }
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The two asset layers, in preparation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Base,
    Theme,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Base => write!(f, "base"),
            Layer::Theme => write!(f, "theme"),
        }
    }
}

/// Progress reported while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    AssetsPrepared { layer: Layer },
    PageRendered { page: String, depth: usize },
    PageFailed { page: String, error: String },
}

/// Result of a successful render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
}

/// A started build.
#[must_use]
pub struct Build {
    /// Outcome of asset preparation and page rendering.
    pub outcome: Result<BuildSummary, BuildError>,
    /// The detached SEO emission.
    pub seo: SeoHandle,
}

impl Build {
    /// Wait for SEO emission, then report the build.
    ///
    /// A pipeline failure takes precedence over a failed SEO emission.
    pub fn finish(self) -> Result<(BuildSummary, SeoOutcome), BuildError> {
        let seo = self.seo.wait();
        let summary = self.outcome?;
        Ok((summary, seo?))
    }
}

/// Locate the theme directory: explicit path first, then lookup by name.
pub fn resolve_theme_dir(options: &BuildOptions) -> Result<PathBuf, BuildError> {
    if let Some(path) = &options.theme_path {
        return Ok(path.clone());
    }
    find_theme(&options.theme, &options.theme_dirs).ok_or_else(|| BuildError::ThemeNotFound {
        name: options.theme.clone(),
        searched: options.theme_dirs.clone(),
    })
}

/// Build the site for `root` with the embedded base layer and the configured theme.
///
/// An `Err` means the build never started: the theme could not be found, the
/// settings file is invalid, or two albums share a page. Once started, the
/// pipeline outcome is in [`Build::outcome`].
pub fn build(
    root: Arc<Album>,
    options: &BuildOptions,
    events: Option<Sender<BuildEvent>>,
) -> Result<Build, BuildError> {
    let theme_dir = resolve_theme_dir(options)?;
    let base = BaseAssets::new(&options.output, BASE_STYLESHEET);
    let theme = Theme::new(
        theme_dir,
        &options.output,
        ThemeOptions {
            stylesheet_name: THEME_STYLESHEET.to_string(),
            custom_styles_path: options.theme_style.clone(),
        },
    );
    build_with_providers(root, options, &base, &theme, events)
}

/// Build the site with the given asset providers (allows testing with mocks).
pub fn build_with_providers(
    root: Arc<Album>,
    options: &BuildOptions,
    base: &dyn AssetProvider,
    theme: &dyn PageRenderer,
    events: Option<Sender<BuildEvent>>,
) -> Result<Build, BuildError> {
    let album_count = album::validate(&root)?;
    let settings = load_theme_settings(options.theme_settings.as_deref())?;
    let context = TemplateContext::new(options, &settings, &root);
    let tasks = build_tasks(theme, &context, &root, Vec::new());
    debug_assert_eq!(tasks.len(), album_count);

    tracing::info!(pages = tasks.len(), output = %options.output.display(), "Building site");
    let seo = spawn_seo(
        options.output.clone(),
        options.seo_location.clone(),
        Arc::clone(&root),
    );
    let outcome = run_pipeline(base, theme, &tasks, events);
    match &outcome {
        Ok(summary) => tracing::info!(pages = summary.pages, "Site built"),
        Err(e) => tracing::warn!(error = %e, "Site build failed"),
    }
    Ok(Build { outcome, seo })
}

/// Prepare base, then theme, then render every unit in parallel.
fn run_pipeline(
    base: &dyn AssetProvider,
    theme: &dyn PageRenderer,
    tasks: &[RenderUnit<'_>],
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    prepare_layer(Layer::Base, || base.prepare(), &events)?;
    prepare_layer(Layer::Theme, || theme.prepare(), &events)?;

    // collect() never short-circuits, so every unit settles before we look at errors
    let results: Vec<Result<(), BuildError>> = tasks
        .par_iter()
        .map_with(events, |events, unit| {
            let result = unit.run();
            match &result {
                Ok(()) => {
                    tracing::debug!(page = %unit.page, "Rendered");
                    notify(
                        events,
                        BuildEvent::PageRendered {
                            page: unit.page.to_string(),
                            depth: unit.depth(),
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(page = %unit.page, error = %e, "Render failed");
                    notify(
                        events,
                        BuildEvent::PageFailed {
                            page: unit.page.to_string(),
                            error: e.to_string(),
                        },
                    );
                }
            }
            result.map_err(|source| BuildError::Render {
                page: unit.page.to_string(),
                source,
            })
        })
        .collect();

    let pages = results.len();
    match results.into_iter().find_map(Result::err) {
        Some(err) => Err(err),
        None => Ok(BuildSummary { pages }),
    }
}

fn prepare_layer(
    layer: Layer,
    prepare: impl FnOnce() -> Result<(), ThemeError>,
    events: &Option<Sender<BuildEvent>>,
) -> Result<(), BuildError> {
    prepare().map_err(|source| BuildError::AssetPreparation { layer, source })?;
    tracing::debug!(%layer, "Assets prepared");
    notify(events, BuildEvent::AssetsPrepared { layer });
    Ok(())
}

fn notify(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is listening any more
        let _ = tx.send(event);
    }
}
