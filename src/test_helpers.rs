//! Shared test utilities.
//!
//! Provides a sample album tree, a throwaway theme writer, and recording
//! asset providers that stand in for real themes.
//!
//! The recording providers use `Mutex` and atomics (not `RefCell`/`Cell`) so
//! they are `Sync` and can be driven from rayon workers.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let log = CallLog::default();
//! let base = RecordingAssets::new("base", log.clone());
//! let theme = RecordingRenderer::with_log(log.clone());
//! // ... run a build ...
//! assert_eq!(log.entries()[0], "prepare:base");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::album::Album;
use crate::context::TemplateContext;
use crate::theme::{AssetProvider, PageRenderer, ThemeError};

// =========================================================================
// Fixtures
// =========================================================================

/// A five-album tree:
///
/// ```text
/// index.html
/// ├── travel.html
/// │   ├── travel-japan.html
/// │   └── travel-italy.html
/// └── portraits.html
/// ```
pub fn sample_tree() -> Album {
    Album::new("index.html", "").with_albums(vec![
        Album::new("travel.html", "travel.html").with_albums(vec![
            Album::new("travel-japan.html", "travel-japan.html"),
            Album::new("travel-italy.html", "travel-italy.html"),
        ]),
        Album::new("portraits.html", "portraits.html"),
    ])
}

/// All album paths in walk order.
pub fn paths(root: &Album) -> Vec<&str> {
    root.walk().map(|(_, a)| a.path.as_str()).collect()
}

/// Write a minimal theme (`theme-test/album.html`) under `dir`.
pub fn write_theme(dir: &Path, album_template: &str) -> PathBuf {
    let theme_dir = dir.join("theme-test");
    fs::create_dir_all(&theme_dir).unwrap();
    fs::write(theme_dir.join("album.html"), album_template).unwrap();
    theme_dir
}

fn injected_failure(what: &str) -> ThemeError {
    ThemeError::Io(std::io::Error::other(format!("injected failure: {what}")))
}

// =========================================================================
// Recording providers
// =========================================================================

/// Ordered log of provider calls, shared between providers.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Asset-only provider that records `prepare` calls.
pub struct RecordingAssets {
    name: String,
    log: CallLog,
    fail: bool,
    prepared: AtomicUsize,
}

impl RecordingAssets {
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            fail: false,
            prepared: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str, log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(name, log)
        }
    }

    pub fn prepare_count(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }
}

impl AssetProvider for RecordingAssets {
    fn prepare(&self) -> Result<(), ThemeError> {
        self.prepared.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("prepare:{}", self.name));
        if self.fail {
            return Err(injected_failure(&self.name));
        }
        Ok(())
    }
}

/// Page renderer that records what it was asked to render.
#[derive(Default)]
pub struct RecordingRenderer {
    log: CallLog,
    fail_prepare: bool,
    fail_pages: Vec<String>,
    prepared: AtomicUsize,
    /// page → breadcrumb paths, one entry per render call
    rendered: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn failing_prepare() -> Self {
        Self {
            fail_prepare: true,
            ..Self::default()
        }
    }

    pub fn failing_on(pages: &[&str]) -> Self {
        Self {
            fail_pages: pages.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn prepare_count(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }

    pub fn render_count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }

    /// Rendered pages in call order.
    pub fn rendered_pages(&self) -> Vec<String> {
        self.rendered
            .lock()
            .unwrap()
            .iter()
            .map(|(page, _)| page.clone())
            .collect()
    }

    /// Breadcrumb paths the given page was rendered with. Panics if it never was.
    pub fn breadcrumbs_for(&self, page: &str) -> Vec<String> {
        let rendered: HashMap<String, Vec<String>> =
            self.rendered.lock().unwrap().iter().cloned().collect();
        rendered.get(page).cloned().unwrap_or_else(|| {
            let pages: Vec<&String> = rendered.keys().collect();
            panic!("page '{page}' was not rendered. Rendered: {pages:?}")
        })
    }
}

impl AssetProvider for RecordingRenderer {
    fn prepare(&self) -> Result<(), ThemeError> {
        self.prepared.fetch_add(1, Ordering::SeqCst);
        self.log.push("prepare:theme".to_string());
        if self.fail_prepare {
            return Err(injected_failure("theme"));
        }
        Ok(())
    }
}

impl PageRenderer for RecordingRenderer {
    fn render(&self, page: &str, context: &TemplateContext<'_>) -> Result<(), ThemeError> {
        let crumbs = context
            .breadcrumbs
            .iter()
            .map(|a| a.path.clone())
            .collect();
        self.rendered
            .lock()
            .unwrap()
            .push((page.to_string(), crumbs));
        self.log.push(format!("render:{page}"));
        if self.fail_pages.iter().any(|p| p == page) {
            return Err(injected_failure(page));
        }
        Ok(())
    }
}
