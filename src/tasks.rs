//! Render task enumeration.
//!
//! Walks the album tree once and produces one deferred [`RenderUnit`] per
//! album. Each unit carries its own specialized [`TemplateContext`], with the
//! breadcrumb trail accumulated on the way down:
//!
//! ```text
//! Home                    breadcrumbs: []
//! ├── Travel              breadcrumbs: [Home]
//! │   ├── Japan           breadcrumbs: [Home, Travel]
//! │   └── Italy           breadcrumbs: [Home, Travel]
//! └── Portraits           breadcrumbs: [Home]
//! ```
//!
//! Units are listed in pre-order (parent before children, children in
//! declared order). The order only makes enumeration reproducible; units may
//! run in any order.

use crate::album::Album;
use crate::context::TemplateContext;
use crate::theme::{PageRenderer, ThemeError};

/// One page waiting to be rendered.
pub struct RenderUnit<'a> {
    theme: &'a dyn PageRenderer,
    /// Album path passed to the renderer.
    pub page: &'a str,
    /// Context with `album` and `breadcrumbs` set for this page.
    pub context: TemplateContext<'a>,
}

impl RenderUnit<'_> {
    /// Render the page. Nothing happens until this is called.
    pub fn run(&self) -> Result<(), ThemeError> {
        self.theme.render(self.page, &self.context)
    }

    /// Depth of the album in the tree (root is 0).
    pub fn depth(&self) -> usize {
        self.context.breadcrumbs.len()
    }
}

/// Build one render unit per album under `album`, in pre-order.
///
/// `breadcrumbs` is the ancestor trail of `album` itself (empty for the root).
pub fn build_tasks<'a>(
    theme: &'a dyn PageRenderer,
    base: &TemplateContext<'a>,
    album: &'a Album,
    breadcrumbs: Vec<&'a Album>,
) -> Vec<RenderUnit<'a>> {
    let mut units = Vec::new();
    let mut stack = vec![(album, breadcrumbs)];

    while let Some((current, trail)) = stack.pop() {
        // Reversed so children come off the stack in declared order
        for child in current.albums.iter().rev() {
            let mut child_trail = trail.clone();
            child_trail.push(current);
            stack.push((child, child_trail));
        }
        units.push(RenderUnit {
            theme,
            page: &current.path,
            context: base.for_album(current, trail),
        });
    }

    units
}
