//! Sitemap and robots.txt.
//!
//! When a public base URL is configured, two discovery files are written to
//! the output root:
//!
//! ```text
//! robots.txt     User-Agent: *
//!                Disallow:
//!
//!                Sitemap: https://photos.example.com/sitemap.xml
//!
//! sitemap.xml    <urlset> with one <url> per album, in tree order
//! ```
//!
//! Every `<lastmod>` carries the same timestamp, taken once when emission
//! starts.
//!
//! Emission is independent of page rendering: [`spawn_seo`] runs it on its
//! own thread and hands back a [`SeoHandle`]. The build pipeline never waits
//! for it; callers that need the files on disk (the CLI before exiting, tests)
//! call [`SeoHandle::wait`].

use crate::album::Album;
use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SEO emission thread panicked")]
    Panicked,
}

/// What an emission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoOutcome {
    /// No SEO location configured, nothing written.
    Skipped,
    /// Both files written, with this many sitemap entries.
    Written { entries: usize },
}

/// Normalize a base URL to end with exactly one `/`.
pub fn seo_prefix(location: &str) -> String {
    format!("{}/", location.trim_end_matches('/'))
}

pub fn robots_txt(prefix: &str) -> String {
    format!("User-Agent: *\nDisallow:\n\nSitemap: {prefix}sitemap.xml\n")
}

/// Render the sitemap for every album under `root`, in pre-order.
pub fn sitemap_xml(prefix: &str, root: &Album, lastmod: &str) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (_, album) in root.walk() {
        let loc = format!("{prefix}{}", album.url);
        xml.push_str("    <url>\n");
        xml.push_str(&format!("        <loc>{}</loc>\n", escape(loc.as_str())));
        xml.push_str(&format!("        <lastmod>{lastmod}</lastmod>\n"));
        xml.push_str("    </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Write robots.txt and sitemap.xml to `output_dir`.
///
/// Does nothing when `location` is `None` or empty.
pub fn emit_seo(
    output_dir: &Path,
    location: Option<&str>,
    root: &Album,
) -> Result<SeoOutcome, SeoError> {
    let Some(location) = location.filter(|l| !l.is_empty()) else {
        return Ok(SeoOutcome::Skipped);
    };
    let prefix = seo_prefix(location);
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join("robots.txt"), robots_txt(&prefix))?;
    fs::write(
        output_dir.join("sitemap.xml"),
        sitemap_xml(&prefix, root, &now),
    )?;

    let entries = root.count();
    tracing::debug!(prefix = %prefix, entries, "Wrote sitemap.xml and robots.txt");
    Ok(SeoOutcome::Written { entries })
}

/// Handle to a detached SEO emission.
///
/// Dropping it leaves the emission running on its own.
#[must_use = "dropping the handle detaches the emission; call wait() to join it"]
pub struct SeoHandle(Option<JoinHandle<Result<SeoOutcome, SeoError>>>);

impl SeoHandle {
    /// A handle for an emission that was never started.
    pub fn skipped() -> Self {
        Self(None)
    }

    /// Block until the emission finished.
    pub fn wait(self) -> Result<SeoOutcome, SeoError> {
        match self.0 {
            Some(handle) => handle.join().map_err(|_| SeoError::Panicked)?,
            None => Ok(SeoOutcome::Skipped),
        }
    }
}

/// Start SEO emission on its own thread.
///
/// No thread is started when `location` is `None` or empty.
pub fn spawn_seo(output_dir: PathBuf, location: Option<String>, root: Arc<Album>) -> SeoHandle {
    let Some(location) = location.filter(|l| !l.is_empty()) else {
        return SeoHandle::skipped();
    };
    let handle = std::thread::spawn(move || {
        let result = emit_seo(&output_dir, Some(location.as_str()), &root);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "SEO emission failed");
        }
        result
    });
    SeoHandle(Some(handle))
}
