//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Albums are shown by their title and positional index among their
//! siblings, with the file they render to as secondary context after `→`.
//! Albums without a title fall back to their path.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Home → index.html
//! 001 Travel → travel.html
//!     001 Japan → travel-japan.html
//!     002 Italy → travel-italy.html
//! 002 Portraits → portraits.html
//!
//! 5 albums
//! ```
//!
//! ## Build
//!
//! ```text
//! Assets: base
//! Assets: theme
//! index.html
//!     travel.html
//!         travel-japan.html
//! FAILED portraits.html: Template error: ...
//! Sitemap: 5 entries
//! Built 5 pages → dist
//! ```
//!
//! Rendered pages arrive in completion order, so their order varies between
//! runs. Indentation reflects album depth.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure, no I/O.

use crate::album::Album;
use crate::seo::SeoOutcome;
use crate::website::{BuildEvent, BuildSummary};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display name of an album: its title, or its path when untitled.
fn display_name(album: &Album) -> &str {
    match album.title() {
        Some(t) if !t.is_empty() => t,
        _ => &album.path,
    }
}

fn count_of(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the album tree below the root.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    album: &'a Album,
}

/// Walk the children of `root`, assigning positional indices per sibling level.
fn walk_album_tree(root: &Album) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    let mut stack: Vec<TreeNode<'_>> = Vec::new();
    for (i, child) in root.albums.iter().enumerate().rev() {
        stack.push(TreeNode {
            depth: 0,
            position: i + 1,
            album: child,
        });
    }
    while let Some(node) = stack.pop() {
        for (i, child) in node.album.albums.iter().enumerate().rev() {
            stack.push(TreeNode {
                depth: node.depth + 1,
                position: i + 1,
                album: child,
            });
        }
        nodes.push(node);
    }
    nodes
}

// ============================================================================
// Check output
// ============================================================================

/// Format the album tree: every album with the file it renders to.
pub fn format_album_tree(root: &Album) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {}",
        display_name(root),
        root.page_file().display()
    )];

    for node in walk_album_tree(root) {
        lines.push(format!(
            "{}{} {} \u{2192} {}",
            indent(node.depth),
            format_index(node.position),
            display_name(node.album),
            node.album.page_file().display()
        ));
    }

    lines.push(String::new());
    lines.push(count_of(root.count(), "album", "albums"));
    lines
}

/// Print the album tree to stdout.
pub fn print_album_tree(root: &Album) {
    for line in format_album_tree(root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::AssetsPrepared { layer } => vec![format!("Assets: {layer}")],
        BuildEvent::PageRendered { page, depth } => vec![format!("{}{}", indent(*depth), page)],
        BuildEvent::PageFailed { page, error } => vec![format!("FAILED {page}: {error}")],
    }
}

/// Format the result of sitemap emission.
pub fn format_seo_outcome(outcome: &SeoOutcome) -> String {
    match outcome {
        SeoOutcome::Skipped => "Sitemap: skipped (no seo_location)".to_string(),
        SeoOutcome::Written { entries } => {
            format!("Sitemap: {}", count_of(*entries, "entry", "entries"))
        }
    }
}

/// Format the final line of a successful build.
pub fn format_build_summary(summary: &BuildSummary, output_dir: &Path) -> String {
    format!(
        "Built {} \u{2192} {}",
        count_of(summary.pages, "page", "pages"),
        output_dir.display()
    )
}

/// Print the sitemap outcome and build summary to stdout.
pub fn print_build_result(summary: &BuildSummary, seo: &SeoOutcome, output_dir: &Path) {
    println!("{}", format_seo_outcome(seo));
    println!("{}", format_build_summary(summary, output_dir));
}

// ============================================================================
// Tests
// ============================================================================
