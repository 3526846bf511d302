//! The album tree.
//!
//! Albums arrive as a JSON manifest produced by an upstream scanner. Only
//! three fields carry meaning for the build:
//!
//! ```json
//! {
//!   "path": "index.html",
//!   "url": "",
//!   "title": "Home",
//!   "albums": [
//!     { "path": "trip.html", "url": "trip.html", "title": "Trip", "albums": [] }
//!   ]
//! }
//! ```
//!
//! - `path` is the render target, relative to the output root (see [`page_file`]).
//! - `url` is the public URL of the page, relative to the site root.
//! - `albums` holds nested albums in display order.
//!
//! Everything else (titles, photos, cover images) is kept verbatim in
//! [`Album::content`] and handed to the theme templates untouched.
//!
//! The tree is owned (`Vec<Album>` children), so it is finite and acyclic by
//! construction. Page targets must still be unique across the whole tree,
//! which [`validate`] checks before anything is rendered.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Album path {0:?} does not stay inside the output directory")]
    InvalidPath(String),
    #[error("Albums {first:?} and {second:?} both render to {file}")]
    DuplicatePage {
        first: String,
        second: String,
        file: PathBuf,
    },
}

/// A node in the album tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    /// Render target, relative to the output directory.
    pub path: String,
    /// Public URL relative to the site root, used verbatim in the sitemap.
    pub url: String,
    /// Nested albums, in display order.
    #[serde(default)]
    pub albums: Vec<Album>,
    /// Remaining manifest fields, forwarded to templates as-is.
    #[serde(flatten)]
    pub content: serde_json::Map<String, serde_json::Value>,
}

impl Album {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            albums: Vec::new(),
            content: serde_json::Map::new(),
        }
    }

    /// Builder-style helper to attach nested albums.
    pub fn with_albums(mut self, albums: Vec<Album>) -> Self {
        self.albums = albums;
        self
    }

    /// Read an album tree from a JSON manifest.
    pub fn load(manifest_path: &Path) -> Result<Self, AlbumError> {
        let content = fs::read_to_string(manifest_path)?;
        let album = serde_json::from_str(&content)?;
        Ok(album)
    }

    /// Optional display title from the manifest content.
    pub fn title(&self) -> Option<&str> {
        self.content.get("title").and_then(|t| t.as_str())
    }

    /// Output file this album renders to.
    pub fn page_file(&self) -> PathBuf {
        page_file(&self.path)
    }

    /// Total number of albums in this subtree, including `self`.
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    /// Pre-order walk over the subtree, yielding `(depth, album)`.
    ///
    /// Parents come before their children, children in declared order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![(0, self)] }
    }
}

/// Iterator returned by [`Album::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Album)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Album);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, album) = self.stack.pop()?;
        // Reversed so the first child is popped next
        for child in album.albums.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, album))
    }
}

/// Map an album path to the file it renders to, relative to the output root.
///
/// ```text
/// ""            → index.html
/// "/"           → index.html
/// "trip.html"   → trip.html
/// "/trip"       → trip/index.html
/// "trip/japan/" → trip/japan/index.html
/// "./trip.html" → trip.html
/// ```
///
/// `.` segments are dropped. `..` segments are kept, see [`is_contained`].
pub fn page_file(path: &str) -> PathBuf {
    let trimmed = path.trim_start_matches('/');
    let file = if trimmed.is_empty() || trimmed.ends_with('/') {
        Path::new(trimmed).join("index.html")
    } else {
        let candidate = PathBuf::from(trimmed);
        if candidate.extension().is_some() {
            candidate
        } else {
            candidate.join("index.html")
        }
    };
    file.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Whether a page file stays below the output root: plain segments only,
/// no `..`, no root or drive prefix.
pub fn is_contained(file: &Path) -> bool {
    file.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Check that every album renders inside the output directory and that no
/// two albums render to the same file.
///
/// Returns the number of albums in the tree.
pub fn validate(root: &Album) -> Result<usize, AlbumError> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::new();
    for (_, album) in root.walk() {
        let file = album.page_file();
        if !is_contained(&file) {
            return Err(AlbumError::InvalidPath(album.path.clone()));
        }
        if let Some(first) = seen.get(&file) {
            return Err(AlbumError::DuplicatePage {
                first: first.to_string(),
                second: album.path.clone(),
                file,
            });
        }
        seen.insert(file, &album.path);
    }
    Ok(seen.len())
}
