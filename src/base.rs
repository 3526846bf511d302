//! The base asset layer.
//!
//! Shared by every theme and embedded at compile time:
//! - `static/core.css` → `public/core.css` (reset and breadcrumb basics)
//! - `static/gallery.js` → `public/gallery.js` (keyboard navigation, lazy images)
//!
//! It also owns the template helpers registered on every theme's tera
//! instance, so themes can rely on them without shipping code of their own.

use crate::album::page_file;
use crate::theme::{AssetProvider, ThemeError};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tera::{Tera, Value};

const CORE_CSS: &str = include_str!("../static/core.css");
const GALLERY_JS: &str = include_str!("../static/gallery.js");

/// Embedded base assets.
pub struct BaseAssets {
    dest: PathBuf,
    stylesheet_name: String,
}

impl BaseAssets {
    pub fn new(dest: impl Into<PathBuf>, stylesheet_name: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            stylesheet_name: stylesheet_name.into(),
        }
    }
}

impl AssetProvider for BaseAssets {
    fn prepare(&self) -> Result<(), ThemeError> {
        let public = self.dest.join("public");
        fs::create_dir_all(&public)?;
        fs::write(public.join(&self.stylesheet_name), CORE_CSS)?;
        fs::write(public.join("gallery.js"), GALLERY_JS)?;
        tracing::debug!(dest = %public.display(), "Base assets ready");
        Ok(())
    }
}

/// Register the base template helpers on a tera instance.
///
/// - `relative(from=<album path>)`: rewrite a site-root URL so it resolves
///   from the page being rendered, e.g. `{{ "public/core.css" | relative(from=album.path) }}`.
pub fn register_helpers(tera: &mut Tera) {
    tera.register_filter("relative", relative_filter);
}

fn relative_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let target = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("Filter `relative` expects a string"))?;
    let from = match args.get("from") {
        Some(Value::String(from)) => from.as_str(),
        Some(_) => return Err(tera::Error::msg("Filter `relative`: `from` must be a string")),
        None => "",
    };
    Ok(Value::String(relative_url(from, target)))
}

/// Make a site-root-relative `target` relative to the page rendered for `from`.
///
/// Absolute URLs, fragments and `mailto:` links are returned unchanged.
pub fn relative_url(from: &str, target: &str) -> String {
    if target.contains("://") || target.starts_with('#') || target.starts_with("mailto:") {
        return target.to_string();
    }
    let depth = page_file(from).components().count().saturating_sub(1);
    let url = format!("{}{}", "../".repeat(depth), target.trim_start_matches('/'));
    if url.is_empty() { "./".to_string() } else { url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prepare_writes_embedded_assets() {
        let tmp = TempDir::new().unwrap();
        let base = BaseAssets::new(tmp.path(), "core.css");
        base.prepare().unwrap();

        let css = fs::read_to_string(tmp.path().join("public/core.css")).unwrap();
        assert_eq!(css, CORE_CSS);
        assert!(tmp.path().join("public/gallery.js").is_file());
    }

    #[test]
    fn prepare_is_repeatable() {
        let tmp = TempDir::new().unwrap();
        let base = BaseAssets::new(tmp.path(), "core.css");
        base.prepare().unwrap();
        base.prepare().unwrap();
    }

    #[test]
    fn relative_from_top_level_pages() {
        assert_eq!(relative_url("index.html", "public/core.css"), "public/core.css");
        assert_eq!(relative_url("trip.html", "/public/core.css"), "public/core.css");
    }

    #[test]
    fn relative_from_nested_pages() {
        assert_eq!(relative_url("/trip", "public/core.css"), "../public/core.css");
        assert_eq!(relative_url("a/b/c.html", "x.html"), "../../x.html");
    }

    #[test]
    fn relative_to_site_root() {
        assert_eq!(relative_url("trip.html", ""), "./");
        assert_eq!(relative_url("/trip", ""), "../");
    }

    #[test]
    fn relative_keeps_absolute_urls() {
        assert_eq!(relative_url("/trip", "https://x.test/a"), "https://x.test/a");
        assert_eq!(relative_url("/trip", "#top"), "#top");
        assert_eq!(relative_url("/trip", "mailto:me@x.test"), "mailto:me@x.test");
    }

    #[test]
    fn filter_is_usable_from_templates() {
        let mut tera = Tera::default();
        register_helpers(&mut tera);
        tera.add_raw_template("page", "{{ url | relative(from=page) }}")
            .unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert("url", "public/theme.css");
        ctx.insert("page", "trip/japan.html");
        assert_eq!(tera.render("page", &ctx).unwrap(), "../public/theme.css");
    }

    #[test]
    fn filter_rejects_non_strings() {
        let args = HashMap::new();
        assert!(relative_filter(&Value::from(3), &args).is_err());
    }
}
