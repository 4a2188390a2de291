//! Table of contents.
//!
//! One line per file section: the relative path, dot leaders, and the
//! 1-based page number the section starts on. Entries are never wrapped, so
//! the number of contents pages depends only on the number of files and can
//! be known before any page numbers are.

use crate::sinks::pdf::config::PageGeometry;
use crate::sinks::pdf::layout::{
    paginate, truncate_start, LaidOutPage, Line, PageKind, Span, SpanStyle, TocEntry,
};

pub const HEADING: &str = "Table of Contents";

/// Dots between the path and page number, at the least
const MIN_LEADER: usize = 3;

/// Pages needed to list `entries` files
pub fn page_count(entries: usize, geometry: &PageGeometry) -> usize {
    entries.div_ceil(geometry.body_lines.max(1)).max(1)
}

fn entry_line(entry: &TocEntry, columns: usize) -> Line {
    let page = entry.page.to_string();
    let reserved = page.len() + MIN_LEADER + 2;
    let path = truncate_start(&entry.path, columns.saturating_sub(reserved));
    let dots = columns
        .saturating_sub(path.chars().count() + page.len() + 2)
        .max(MIN_LEADER);

    vec![
        Span::body(path),
        Span::new(format!(" {} ", ".".repeat(dots)), SpanStyle::Muted),
        Span::body(page),
    ]
}

pub fn render(geometry: &PageGeometry, entries: &[TocEntry]) -> Vec<LaidOutPage> {
    let lines: Vec<Line> = entries
        .iter()
        .map(|entry| entry_line(entry, geometry.columns))
        .collect();

    let pages = paginate(
        PageKind::Contents,
        Some(HEADING.to_string()),
        lines,
        geometry.body_lines,
    );
    debug_assert_eq!(pages.len(), page_count(entries.len(), geometry));
    pages
}
