use crate::sinks::pdf::config::PageGeometry;
use crate::sinks::pdf::layout::{paginate, truncate, LaidOutPage, Line, PageKind, Span, SpanStyle};
use crate::source::DirTree;

pub const HEADING: &str = "Directory Listing";

const INDENT: &str = "  ";

fn outline(tree: &DirTree, depth: usize, columns: usize, lines: &mut Vec<Line>) {
    let indent = INDENT.repeat(depth);
    for file in tree.files.iter() {
        let style = if file.included {
            SpanStyle::Body
        } else {
            SpanStyle::Muted
        };
        lines.push(vec![Span::new(
            truncate(&format!("{indent}{}", file.name), columns),
            style,
        )]);
    }
    for dir in tree.dirs.values() {
        lines.push(vec![Span::body(truncate(
            &format!("{indent}{}/", dir.name),
            columns,
        ))]);
        outline(dir, depth + 1, columns, lines);
    }
}

/// Lay out the repository outline, one entry per line, with directories
/// suffixed by `/` and nested entries indented beneath them. Files that were
/// left out of the document are still listed, in a muted style.
pub fn render(geometry: &PageGeometry, tree: &DirTree) -> Vec<LaidOutPage> {
    let mut lines: Vec<Line> = vec![vec![Span::body(truncate(
        &format!("{}/", tree.name),
        geometry.columns,
    ))]];
    outline(tree, 1, geometry.columns, &mut lines);

    paginate(
        PageKind::Listing,
        Some(HEADING.to_string()),
        lines,
        geometry.body_lines,
    )
}
