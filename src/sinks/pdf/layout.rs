//! The page plan produced by the first layout stage.
//!
//! Everything is measured in Courier character cells, so a plan fully
//! determines every page break before any PDF bytes exist. The emitter only
//! turns cells into coordinates.

use crate::highlight::{Token, TokenCategory};
use std::collections::BTreeSet;

/// How a span of text is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Title,
    Heading,
    Body,
    /// Less important text, such as files left out of the document
    Muted,
    /// Line numbers
    Gutter,
    /// Stand-in text for content that couldn't be shown
    Placeholder,
    Token(TokenCategory),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    pub fn new<S: Into<String>>(text: S, style: SpanStyle) -> Span {
        Span {
            text: text.into(),
            style,
        }
    }

    pub fn body<S: Into<String>>(text: S) -> Span {
        Span::new(text, SpanStyle::Body)
    }
}

/// One printed line; an empty line is a blank row
pub type Line = Vec<Span>;

#[cfg(test)]
pub fn line_text(line: &Line) -> String {
    line.iter().map(|span| span.text.as_str()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Listing,
    Contents,
    Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutPage {
    pub kind: PageKind,
    /// Text drawn in the header band
    pub header: Option<String>,
    /// At most [`PageGeometry::body_lines`](super::config::PageGeometry) lines
    pub lines: Vec<Line>,
}

/// A table of contents entry with its resolved page number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub path: String,
    /// 1-based page number of the first page of the file's section
    pub page: usize,
}

/// The complete, immutable result of the first layout stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    pub title: String,
    pub pages: Vec<LaidOutPage>,
    pub contents: Vec<TocEntry>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Bookmarks for the document outline: every file, plus every directory
/// (written with a trailing `/`) pointing at the first file inside it.
pub fn outline(contents: &[TocEntry]) -> Vec<TocEntry> {
    let mut seen: BTreeSet<&str> = BTreeSet::default();
    let mut entries = Vec::with_capacity(contents.len());
    for entry in contents.iter() {
        for (index, _) in entry.path.match_indices('/') {
            let dir = &entry.path[..=index];
            if seen.insert(dir) {
                entries.push(TocEntry {
                    path: dir.to_string(),
                    page: entry.page,
                });
            }
        }
        entries.push(entry.clone());
    }
    entries
}

/// Split `lines` into pages of at most `per_page` lines. Always returns at
/// least one page.
pub fn paginate(
    kind: PageKind,
    header: Option<String>,
    lines: Vec<Line>,
    per_page: usize,
) -> Vec<LaidOutPage> {
    if lines.is_empty() {
        return vec![LaidOutPage {
            kind,
            header,
            lines,
        }];
    }

    let mut pages: Vec<LaidOutPage> = Vec::default();
    let mut lines = lines.into_iter().peekable();
    while lines.peek().is_some() {
        pages.push(LaidOutPage {
            kind,
            header: header.clone(),
            lines: lines.by_ref().take(per_page.max(1)).collect(),
        });
    }
    pages
}

/// Hard-wrap a line of tokens into rows of at most `width` characters.
///
/// Tokens keep their category when split across rows. An empty input
/// produces a single empty row.
pub fn wrap_tokens(tokens: &[Token], width: usize) -> Vec<Line> {
    let width = width.max(1);
    let mut rows: Vec<Line> = vec![Vec::new()];
    let mut used = 0;

    for (text, category) in tokens {
        let mut rest = text.as_str();
        while !rest.is_empty() {
            if used == width {
                rows.push(Vec::new());
                used = 0;
            }
            let take = rest
                .char_indices()
                .nth(width - used)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let (piece, tail) = rest.split_at(take);
            used += piece.chars().count();
            rows.last_mut()
                .expect("rows always has a last row")
                .push(Span::new(piece, SpanStyle::Token(*category)));
            rest = tail;
        }
    }

    rows
}

/// Shorten `text` to `width` characters, marking the cut with `...`
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

/// Keep the end of `text`, which is the interesting part of a long path
pub fn truncate_start(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().skip(count - width).collect();
    }
    let tail: String = text.chars().skip(count - (width - 3)).collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(rows: &[Line]) -> Vec<String> {
        rows.iter().map(line_text).collect()
    }

    #[test]
    fn wrapping_splits_tokens_at_the_width() {
        let tokens = vec![
            ("let".to_string(), TokenCategory::Keyword),
            (" value = ".to_string(), TokenCategory::Default),
            ("\"abcdef\"".to_string(), TokenCategory::String),
        ];
        let rows = wrap_tokens(&tokens, 8);
        assert_eq!(texts(&rows), vec!["let valu", "e = \"abc", "def\""]);
        assert_eq!(rows[2][0].style, SpanStyle::Token(TokenCategory::String));
        assert_eq!(rows[1][1].style, SpanStyle::Token(TokenCategory::String));
    }

    #[test]
    fn wrapping_an_exact_fit_does_not_add_a_row() {
        let tokens = vec![("abcd".to_string(), TokenCategory::Default)];
        assert_eq!(texts(&wrap_tokens(&tokens, 4)), vec!["abcd"]);
        assert_eq!(wrap_tokens(&[], 4), vec![Vec::new()]);
    }

    #[test]
    fn wrapping_counts_characters_not_bytes() {
        let tokens = vec![("ééé".to_string(), TokenCategory::Default)];
        assert_eq!(texts(&wrap_tokens(&tokens, 2)), vec!["éé", "é"]);
    }

    #[test]
    fn pagination_fills_pages() {
        let lines: Vec<Line> = (0..5).map(|i| vec![Span::body(i.to_string())]).collect();
        let pages = paginate(PageKind::Listing, None, lines, 2);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].lines.len(), 1);
        assert_eq!(paginate(PageKind::Listing, None, Vec::new(), 2).len(), 1);
    }

    #[test]
    fn can_truncate() {
        assert_eq!(truncate("abcdefgh", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
        assert_eq!(truncate_start("src/very/long/path.rs", 10), "...path.rs");
    }

    #[test]
    fn outline_adds_each_directory_once() {
        let entry = |path: &str, page: usize| TocEntry {
            path: path.to_string(),
            page,
        };
        let contents = vec![
            entry("Cargo.toml", 5),
            entry("src/lib.rs", 6),
            entry("src/sinks/pdf.rs", 8),
            entry("src/source.rs", 9),
            entry("tests/cli.rs", 10),
        ];
        let paths: Vec<(String, usize)> = outline(&contents)
            .into_iter()
            .map(|entry| (entry.path, entry.page))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("Cargo.toml".to_string(), 5),
                ("src/".to_string(), 6),
                ("src/lib.rs".to_string(), 6),
                ("src/sinks/".to_string(), 8),
                ("src/sinks/pdf.rs".to_string(), 8),
                ("src/source.rs".to_string(), 9),
                ("tests/".to_string(), 10),
                ("tests/cli.rs".to_string(), 10),
            ]
        );
    }
}
