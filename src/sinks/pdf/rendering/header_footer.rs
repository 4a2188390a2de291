//! Running headers and footers.
//!
//! Footers read `page {n} of {total}` and appear on every page except the
//! cover. Templates support placeholders:
//! - `{n}` - 1-based page number
//! - `{total}` - total page count

use crate::sinks::pdf::layout::PageKind;

pub const FOOTER_TEMPLATE: &str = "page {n} of {total}";

/// Expand a template string with placeholder values.
fn expand_template(template: &str, page_number: usize, total: usize) -> String {
    template
        .replace("{n}", &page_number.to_string())
        .replace("{total}", &total.to_string())
}

/// Footer text for the page at `page_index` (0-based) in a document of
/// `total` pages, or `None` for the cover.
pub fn footer_text(kind: PageKind, page_index: usize, total: usize) -> Option<String> {
    match kind {
        PageKind::Cover => None,
        _ => Some(expand_template(FOOTER_TEMPLATE, page_index + 1, total)),
    }
}
