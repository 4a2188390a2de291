//! Source file rendering.
//!
//! Each file becomes its own section starting on a fresh page, with the file's
//! relative path in the header of every page. Long lines are hard-wrapped at
//! the column limit; continuation rows get a blank gutter so line numbers
//! still match the file. Files that can't be read or aren't UTF-8 are shown
//! as a placeholder instead of failing the document.

use crate::error::FileReadError;
use crate::highlight::{Highlighter, Tokenizer};
use crate::sinks::pdf::config::{PageGeometry, PDF};
use crate::sinks::pdf::layout::{
    paginate, truncate_start, wrap_tokens, LaidOutPage, Line, PageKind, Span, SpanStyle,
};
use crate::source::FileEntry;

pub const UNREADABLE: &str = "[unreadable content]";
pub const EMPTY: &str = "[empty file]";

const TAB: &str = "    ";
/// Spaces between the line number and the code
const GUTTER_GAP: usize = 2;

/// A laid out file section
#[derive(Debug)]
pub struct SourceSection {
    pub pages: Vec<LaidOutPage>,
    /// Source lines that needed more than one printed line
    pub wrapped_lines: usize,
    /// Whether the file was replaced by the unreadable placeholder
    pub unreadable: bool,
}

fn read_contents(file: &FileEntry) -> Result<String, FileReadError> {
    let bytes = std::fs::read(&file.absolute).map_err(|source| FileReadError::Io {
        path: file.relative.clone(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| FileReadError::NotUtf8(file.relative.clone()))
}

/// Lay out the lines of `text` with an optional line number gutter.
///
/// Returns the printed lines and how many source lines had to be wrapped.
pub fn layout_text(
    text: &str,
    tokenizer: &Tokenizer<'_>,
    columns: usize,
    line_numbers: bool,
) -> (Vec<Line>, usize) {
    let text = text.trim_start_matches('\u{feff}').replace('\t', TAB);
    let source_lines = tokenizer.tokenize(&text);

    let number_width = source_lines.len().to_string().len();
    let gutter_width = if line_numbers {
        number_width + GUTTER_GAP
    } else {
        0
    };
    let text_width = columns.saturating_sub(gutter_width).max(1);

    let mut lines: Vec<Line> = Vec::with_capacity(source_lines.len());
    let mut wrapped = 0;
    for (i, tokens) in source_lines.iter().enumerate() {
        let rows = wrap_tokens(tokens, text_width);
        if rows.len() > 1 {
            wrapped += 1;
        }
        for (ri, mut row) in rows.into_iter().enumerate() {
            if line_numbers {
                let gutter = if ri == 0 {
                    format!("{:>number_width$}{}", i + 1, " ".repeat(GUTTER_GAP))
                } else {
                    " ".repeat(gutter_width)
                };
                row.insert(0, Span::new(gutter, SpanStyle::Gutter));
            }
            lines.push(row);
        }
    }

    (lines, wrapped)
}

pub fn render(
    config: &PDF,
    geometry: &PageGeometry,
    heading_columns: usize,
    file: &FileEntry,
    highlighter: Option<&Highlighter>,
) -> SourceSection {
    let header = truncate_start(&file.display_path(), heading_columns);
    let section = |lines: Vec<Line>, wrapped_lines: usize, unreadable: bool| SourceSection {
        pages: paginate(
            PageKind::Source,
            Some(header.clone()),
            lines,
            geometry.body_lines,
        ),
        wrapped_lines,
        unreadable,
    };

    let text = match read_contents(file) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("showing placeholder: {e}");
            return section(
                vec![vec![Span::new(UNREADABLE, SpanStyle::Placeholder)]],
                0,
                true,
            );
        }
    };
    if text.is_empty() {
        return section(vec![vec![Span::new(EMPTY, SpanStyle::Placeholder)]], 0, false);
    }

    let tokenizer = match highlighter {
        Some(highlighter) if config.highlight => highlighter.tokenizer_for(&file.language),
        _ => Tokenizer::Plain,
    };
    log::debug!(
        "laying out {} as {}",
        file.display_path(),
        tokenizer.name()
    );

    let (lines, wrapped) = layout_text(&text, &tokenizer, geometry.columns, config.line_numbers);
    section(lines, wrapped, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::TokenCategory;
    use crate::sinks::pdf::layout::line_text;
    use std::path::Path;

    fn entry(root: &Path, name: &str, contents: &[u8]) -> FileEntry {
        std::fs::write(root.join(name), contents).expect("can write file");
        FileEntry::new(root, name, contents.len() as u64)
    }

    fn geometry(config: &PDF) -> PageGeometry {
        config.geometry().expect("default geometry is valid")
    }

    #[test]
    fn gutter_numbers_are_right_aligned() {
        let text = (1..=10).map(|i| format!("line {i}\n")).collect::<String>();
        let (lines, wrapped) = layout_text(&text, &Tokenizer::Plain, 94, true);
        assert_eq!(lines.len(), 10);
        assert_eq!(wrapped, 0);
        assert_eq!(line_text(&lines[0]), " 1  line 1");
        assert_eq!(line_text(&lines[9]), "10  line 10");
        assert_eq!(lines[0][0].style, SpanStyle::Gutter);
    }

    #[test]
    fn continuation_rows_have_blank_gutters() {
        let text = format!("{}\nshort\n", "x".repeat(30));
        let (lines, wrapped) = layout_text(&text, &Tokenizer::Plain, 13, true);
        assert_eq!(wrapped, 1);
        assert_eq!(
            lines.iter().map(line_text).collect::<Vec<_>>(),
            vec![
                format!("1  {}", "x".repeat(10)),
                format!("   {}", "x".repeat(10)),
                format!("   {}", "x".repeat(10)),
                "2  short".to_string(),
            ]
        );
    }

    #[test]
    fn no_gutter_without_line_numbers() {
        let (lines, _) = layout_text("a\n\tb\n", &Tokenizer::Plain, 94, false);
        assert_eq!(line_text(&lines[1]), "    b");
        assert!(lines
            .iter()
            .flatten()
            .all(|span| span.style != SpanStyle::Gutter));
        assert_eq!(
            lines[1][0].style,
            SpanStyle::Token(TokenCategory::Default)
        );
    }

    #[test]
    fn invalid_utf8_becomes_placeholder() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let file = entry(dir.path(), "bad.txt", &[b'o', b'k', 0xff, 0xfe, b'\n']);
        let config = PDF::default();
        let section = render(&config, &geometry(&config), 40, &file, None);

        assert!(section.unreadable);
        assert_eq!(section.pages.len(), 1);
        assert_eq!(section.pages[0].header.as_deref(), Some("bad.txt"));
        assert_eq!(
            section.pages[0].lines,
            vec![vec![Span::new(UNREADABLE, SpanStyle::Placeholder)]]
        );
    }

    #[test]
    fn empty_files_get_a_placeholder_page() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let file = entry(dir.path(), "empty.rs", b"");
        let config = PDF::default();
        let section = render(&config, &geometry(&config), 40, &file, None);

        assert!(!section.unreadable);
        assert_eq!(section.pages.len(), 1);
        assert_eq!(line_text(&section.pages[0].lines[0]), EMPTY);
    }

    #[test]
    fn long_files_repeat_the_header() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let contents = "fn main() {}\n".repeat(120);
        let file = entry(dir.path(), "main.rs", contents.as_bytes());
        let config = PDF::default();
        let highlighter = Highlighter::new().expect("can load syntaxes");
        let section = render(&config, &geometry(&config), 40, &file, Some(&highlighter));

        // 120 lines at 54 per page
        assert_eq!(section.pages.len(), 3);
        assert!(section
            .pages
            .iter()
            .all(|page| page.header.as_deref() == Some("main.rs")));
        assert!(section.pages[0].lines[0]
            .iter()
            .any(|span| span.style == SpanStyle::Token(TokenCategory::Keyword)));
    }
}
