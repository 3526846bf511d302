//! Data handed to page templates.
//!
//! One [`TemplateContext`] is assembled per build. Every page gets a shallow
//! copy of it with only `album` and `breadcrumbs` swapped in; the shared parts
//! (options, settings, root album) are borrowed, never cloned or mutated.
//!
//! Templates see these top-level keys:
//!
//! | Key | Content |
//! |-----|---------|
//! | `gallery` | Build options, the `[gallery]` pass-through table (keys never collide, see [`BuildOptions::validate`]), and `home` (kept for older themes) |
//! | `settings` | Theme settings from the JSON settings file |
//! | `home` | The root album |
//! | `breadcrumbs` | Ancestors of the current album, root first |
//! | `album` | The album being rendered |

use crate::album::Album;
use crate::config::BuildOptions;
use crate::settings::ThemeSettings;
use serde::Serialize;
use std::collections::BTreeMap;

/// Legacy `gallery` key: options flattened, with the root album as `home`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Gallery<'a> {
    #[serde(flatten)]
    pub options: &'a BuildOptions,
    #[serde(flatten)]
    pub extra: &'a BTreeMap<String, serde_json::Value>,
    pub home: &'a Album,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext<'a> {
    pub gallery: Gallery<'a>,
    pub settings: &'a ThemeSettings,
    pub home: &'a Album,
    pub breadcrumbs: Vec<&'a Album>,
    pub album: Option<&'a Album>,
}

impl<'a> TemplateContext<'a> {
    /// Base context for a build. `album` and `breadcrumbs` are left empty.
    pub fn new(options: &'a BuildOptions, settings: &'a ThemeSettings, home: &'a Album) -> Self {
        Self {
            gallery: Gallery {
                options,
                extra: &options.gallery,
                home,
            },
            settings,
            home,
            breadcrumbs: Vec::new(),
            album: None,
        }
    }

    /// Copy of this context for rendering `album`.
    pub fn for_album(&self, album: &'a Album, breadcrumbs: Vec<&'a Album>) -> Self {
        Self {
            breadcrumbs,
            album: Some(album),
            ..self.clone()
        }
    }
}
