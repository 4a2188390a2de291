//! Title page rendering.
//!
//! Identifies the repository, where it came from, and when the document was
//! generated, along with a short summary of what the document contains.

use crate::sinks::pdf::config::{PageGeometry, PDF};
use crate::sinks::pdf::layout::{truncate, LaidOutPage, Line, PageKind, Span, SpanStyle};
use crate::sinks::pdf::DocumentInfo;

/// Blank rows above the title
const TOP_PADDING: usize = 6;

pub fn human_size(bytes: u64) -> String {
    let size = byte_unit::Byte::from_u64(bytes).get_appropriate_unit(byte_unit::UnitType::Binary);
    format!("{size:.1}")
}

pub fn render(config: &PDF, geometry: &PageGeometry, info: &DocumentInfo) -> LaidOutPage {
    let columns = geometry.columns;
    // the title is set larger, so fewer characters fit
    let title_columns =
        ((columns as f32) * config.font_size_body_pt / config.font_size_title_pt) as usize;

    let field = |label: &str, value: &str| -> Line {
        vec![
            Span::new(format!("{label:<11}"), SpanStyle::Muted),
            Span::body(truncate(value, columns.saturating_sub(11))),
        ]
    };

    let mut lines: Vec<Line> = vec![Vec::new(); TOP_PADDING];
    lines.push(vec![Span::new(
        truncate(&format!("Repository: {}", info.title), title_columns.max(1)),
        SpanStyle::Title,
    )]);
    lines.push(Vec::new());
    lines.push(Vec::new());
    lines.push(field("Source:", &info.label));
    lines.push(field("Generated:", &info.generated));
    lines.push(field(
        "Files:",
        &format!("{} ({})", info.file_count, human_size(info.total_size)),
    ));
    if info.skipped_count > 0 {
        lines.push(field(
            "Skipped:",
            &format!("{} unreadable or binary", info.skipped_count),
        ));
    }
    lines.push(Vec::new());
    lines.push(vec![Span::new(
        concat!("Generated by repo2pdf v", env!("CARGO_PKG_VERSION")),
        SpanStyle::Muted,
    )]);

    lines.truncate(geometry.body_lines);

    LaidOutPage {
        kind: PageKind::Cover,
        header: None,
        lines,
    }
}
