//! # Gallery Site
//!
//! Renders a photo album tree into a static website. An upstream scanner
//! describes the albums as a JSON manifest; this crate turns that tree plus a
//! theme into HTML pages, shared assets, and optional sitemap/robots files.
//!
//! # Build Pipeline
//!
//! ```text
//! albums.json ─► Album tree ─► TemplateContext ─► one RenderUnit per album
//!                                                        │
//!                   prepare base ─► prepare theme ─► render (rayon) ─► dist/
//!                   sitemap.xml + robots.txt (own thread)       ─────► dist/
//! ```
//!
//! Asset layers are prepared strictly in order before any page is rendered.
//! Pages then render in parallel and every page is attempted even when some
//! fail. SEO files are written independently of rendering.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`album`] | The album tree: manifest loading, pre-order walks, page file mapping |
//! | [`config`] | `config.toml` loading, validation, and command-line overrides |
//! | [`settings`] | Theme settings JSON exposed to templates as `settings` |
//! | [`context`] | The serializable template context and its per-album specialization |
//! | [`theme`] | Asset provider traits and directory-based tera themes |
//! | [`base`] | Embedded base assets and shared template filters |
//! | [`tasks`] | Enumeration of deferred per-album render units with breadcrumbs |
//! | [`seo`] | sitemap.xml and robots.txt emission |
//! | [`website`] | Orchestration: theme resolution, layer ordering, parallel rendering |
//! | [`output`] | CLI output formatting for builds and album trees |
//!
//! # Themes
//!
//! A theme is a directory with an `album.html` tera template, optional
//! `partials/`, an optional `theme.css`, and an optional `public/` folder.
//! Templates see `gallery` (config plus the `[gallery]` table), `settings`,
//! `home`, `album`, and `breadcrumbs`. See [`theme`] for the layout.

pub mod album;
pub mod base;
pub mod config;
pub mod context;
pub mod output;
pub mod seo;
pub mod settings;
pub mod tasks;
pub mod theme;
pub mod website;

#[cfg(test)]
pub(crate) mod test_helpers;
