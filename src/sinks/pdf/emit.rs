//! PDF emission, the second rendering stage.
//!
//! Turns a [`PagePlan`] into PDF bytes using printpdf's built-in fonts. All
//! text is set in the Courier family, so a character cell in the plan maps
//! directly onto a fixed advance on the page. Each printed line is its own
//! text object with an absolute starting position, so nothing here can change
//! where a page breaks.
//!
//! The built-in fonts are declared with `WinAnsiEncoding`. Text which isn't
//! plain ASCII is encoded to Windows-1252 here and written with a raw `Tj`.

use crate::character_width::width_of_chars;
use crate::highlight::TokenCategory;
use crate::sinks::pdf::config::{PageGeometry, HEADER_LINES, PDF};
use crate::sinks::pdf::layout::{outline, Line, PagePlan, SpanStyle};
use crate::sinks::pdf::rendering::footer_text;
use encoding_rs::WINDOWS_1252;
use printpdf::{
    BuiltinFont, Color, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, Rgb,
    TextItem,
};

const MM_PER_PT: f32 = 25.4 / 72.0;

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

struct Pen {
    font: BuiltinFont,
    size: f32,
    colour: Color,
}

fn pen(config: &PDF, style: SpanStyle) -> Pen {
    let body = config.font_size_body_pt;
    let (font, size, colour) = match style {
        SpanStyle::Title => (
            BuiltinFont::CourierBold,
            config.font_size_title_pt,
            rgb(0.0, 0.0, 0.0),
        ),
        SpanStyle::Heading => (
            BuiltinFont::CourierBold,
            config.font_size_heading_pt,
            rgb(0.0, 0.0, 0.0),
        ),
        SpanStyle::Body => (BuiltinFont::Courier, body, rgb(0.0, 0.0, 0.0)),
        SpanStyle::Muted => (BuiltinFont::Courier, body, rgb(0.45, 0.45, 0.45)),
        SpanStyle::Gutter => (BuiltinFont::Courier, body, rgb(0.55, 0.55, 0.55)),
        SpanStyle::Placeholder => (BuiltinFont::CourierOblique, body, rgb(0.4, 0.4, 0.4)),
        SpanStyle::Token(category) if config.highlight => match category {
            TokenCategory::Keyword => (BuiltinFont::CourierBold, body, rgb(0.0, 0.2, 0.6)),
            TokenCategory::String => (BuiltinFont::Courier, body, rgb(0.0, 0.45, 0.1)),
            TokenCategory::Comment => (BuiltinFont::CourierOblique, body, rgb(0.45, 0.45, 0.45)),
            TokenCategory::Literal => (BuiltinFont::Courier, body, rgb(0.65, 0.3, 0.0)),
            TokenCategory::Default => (BuiltinFont::Courier, body, rgb(0.0, 0.0, 0.0)),
        },
        SpanStyle::Token(_) => (BuiltinFont::Courier, body, rgb(0.0, 0.0, 0.0)),
    };
    Pen { font, size, colour }
}

/// The Windows-1252 byte for `c`, if it has one and isn't a control character
fn win_ansi_byte(c: char) -> Option<u8> {
    if c.is_control() {
        return None;
    }
    let mut buf = [0u8; 4];
    let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (unmappable, bytes.as_ref()) {
        (false, [byte]) => Some(*byte),
        _ => None,
    }
}

/// Text as the built-in fonts can show it: anything Windows-1252 can't
/// represent becomes `?`.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if win_ansi_byte(c).is_some() { c } else { '?' })
        .collect()
}

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

fn show_text(ops: &mut Vec<Op>, font: BuiltinFont, text: &str) {
    if text.is_ascii() {
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        return;
    }
    // no items, so nothing is written, but the font joins the page resources
    ops.push(Op::WriteTextBuiltinFont {
        items: Vec::new(),
        font,
    });
    ops.push(Op::Unknown {
        key: "Tj".to_string(),
        value: vec![DictItem::String {
            data: win_ansi(text),
            literal: false,
        }],
    });
}

fn write_text(ops: &mut Vec<Op>, x: f32, y: f32, runs: &[(Pen, String)]) {
    if runs.iter().all(|(_, text)| text.is_empty()) {
        return;
    }
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point { x: Pt(x), y: Pt(y) },
    });
    for (pen, text) in runs.iter() {
        if text.is_empty() {
            continue;
        }
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(pen.size),
            font: pen.font,
        });
        ops.push(Op::SetFillColor {
            col: pen.colour.clone(),
        });
        show_text(ops, pen.font, text);
    }
    ops.push(Op::EndTextSection);
}

fn runs(config: &PDF, line: &Line) -> Vec<(Pen, String)> {
    line.iter()
        .map(|span| (pen(config, span.style), printable(&span.text)))
        .collect()
}

fn page_ops(
    config: &PDF,
    geometry: &PageGeometry,
    header: Option<&str>,
    lines: &[Line],
    footer: Option<String>,
) -> Vec<Op> {
    let mut ops: Vec<Op> = Vec::default();
    let left = geometry.margin_horizontal_pt;
    let top = geometry.height_pt - geometry.margin_vertical_pt;

    if let Some(header) = header {
        write_text(
            &mut ops,
            left,
            top - config.font_size_heading_pt,
            &[(pen(config, SpanStyle::Heading), printable(header))],
        );
    }

    for (i, line) in lines.iter().enumerate() {
        let baseline = top - (HEADER_LINES + i + 1) as f32 * geometry.line_height_pt;
        write_text(&mut ops, left, baseline, &runs(config, line));
    }

    if let Some(footer) = footer {
        let size = config.font_size_small_pt;
        let width = width_of_chars(footer.chars().count(), size);
        let footer_pen = Pen {
            font: BuiltinFont::Courier,
            size,
            colour: rgb(0.35, 0.35, 0.35),
        };
        write_text(
            &mut ops,
            (geometry.width_pt - width) / 2.0,
            geometry.margin_vertical_pt / 2.0,
            &[(footer_pen, footer)],
        );
    }

    ops
}

/// Produce the finished PDF for `plan`.
pub fn emit(config: &PDF, geometry: &PageGeometry, plan: &PagePlan) -> Vec<u8> {
    let total = plan.page_count();
    let pages: Vec<PdfPage> = plan
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let ops = page_ops(
                config,
                geometry,
                page.header.as_deref(),
                &page.lines,
                footer_text(page.kind, index, total),
            );
            PdfPage::new(
                Mm(geometry.width_pt * MM_PER_PT),
                Mm(geometry.height_pt * MM_PER_PT),
                ops,
            )
        })
        .collect();

    let mut doc = PdfDocument::new(&printable(&plan.title));
    doc.with_pages(pages);
    for entry in outline(&plan.contents) {
        doc.add_bookmark(&entry.path, entry.page);
    }

    // raw `Tj` operators are dropped by the secure default
    let options = PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    };
    let mut warnings = Vec::default();
    let bytes = doc.save(&options, &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warning(s)", warnings.len());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::pdf::layout::{LaidOutPage, PageKind, Span, TocEntry};
    use printpdf::PdfParseOptions;

    #[test]
    fn windows_1252_text_is_kept() {
        let line = "// Copyright © 2024 Zoë Müller, café";
        assert_eq!(printable(line), line);
        assert_eq!(printable("fn main() {}"), "fn main() {}");
        assert_eq!(printable("“quoted” – €5"), "“quoted” – €5");
    }

    #[test]
    fn other_characters_are_replaced() {
        assert_eq!(printable("naïve\tcafé"), "naïve?café");
        assert_eq!(printable("λx → x 你好"), "?x ? x ??");
        assert_eq!(printable("\u{81}"), "?");
    }

    #[test]
    fn non_ascii_text_is_encoded_as_windows_1252() {
        assert_eq!(win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(win_ansi("© €"), vec![0xa9, b' ', 0x80]);

        let mut ops = Vec::default();
        show_text(&mut ops, BuiltinFont::Courier, "Zoë");
        assert!(matches!(
            &ops[0],
            Op::WriteTextBuiltinFont { items, font: BuiltinFont::Courier } if items.is_empty()
        ));
        match &ops[1] {
            Op::Unknown { key, value } => {
                assert_eq!(key, "Tj");
                assert_eq!(
                    value,
                    &vec![DictItem::String {
                        data: vec![b'Z', b'o', 0xeb],
                        literal: false,
                    }]
                );
            }
            other => panic!("expected a raw text operator, got {other:?}"),
        }

        let mut ops = Vec::default();
        show_text(&mut ops, BuiltinFont::Courier, "plain");
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn headings_use_the_monospaced_family() {
        let config = PDF::default();
        assert_eq!(pen(&config, SpanStyle::Heading).font, BuiltinFont::CourierBold);
        assert_eq!(pen(&config, SpanStyle::Title).font, BuiltinFont::CourierBold);
    }

    #[test]
    fn lines_become_text_objects() {
        let config = PDF::default();
        let geometry = config.geometry().expect("default geometry is valid");
        let lines: Vec<Line> = vec![
            vec![Span::body("one")],
            Vec::new(),
            vec![Span::body("three"), Span::new("!", SpanStyle::Muted)],
        ];
        let ops = page_ops(&config, &geometry, Some("header"), &lines, None);
        let sections = ops
            .iter()
            .filter(|op| matches!(op, Op::StartTextSection))
            .count();
        // header plus two non-empty lines
        assert_eq!(sections, 3);
    }

    #[test]
    fn emits_a_pdf() {
        let config = PDF::default();
        let geometry = config.geometry().expect("default geometry is valid");
        let plan = PagePlan {
            title: "demo".to_string(),
            pages: vec![
                LaidOutPage {
                    kind: PageKind::Cover,
                    header: None,
                    lines: vec![vec![Span::new("demo", SpanStyle::Title)]],
                },
                LaidOutPage {
                    kind: PageKind::Source,
                    header: Some("main.rs".to_string()),
                    lines: vec![vec![Span::body("fn main() {}")]],
                },
            ],
            contents: Vec::new(),
        };
        let bytes = emit(&config, &geometry, &plan);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn outline_entries_can_be_read_back() {
        let config = PDF::default();
        let geometry = config.geometry().expect("default geometry is valid");
        let source_page = |header: &str| LaidOutPage {
            kind: PageKind::Source,
            header: Some(header.to_string()),
            lines: vec![vec![Span::body("x = 1")]],
        };
        let plan = PagePlan {
            title: "demo".to_string(),
            pages: vec![
                LaidOutPage {
                    kind: PageKind::Cover,
                    header: None,
                    lines: vec![vec![Span::new("demo", SpanStyle::Title)]],
                },
                source_page("README.md"),
                source_page("src/main.rs"),
                source_page("src/util/mod.rs"),
            ],
            contents: vec![
                TocEntry {
                    path: "README.md".to_string(),
                    page: 2,
                },
                TocEntry {
                    path: "src/main.rs".to_string(),
                    page: 3,
                },
                TocEntry {
                    path: "src/util/mod.rs".to_string(),
                    page: 4,
                },
            ],
        };
        let bytes = emit(&config, &geometry, &plan);

        let mut warnings = Vec::default();
        let parsed = PdfDocument::parse(&bytes, &PdfParseOptions::default(), &mut warnings)
            .expect("can parse emitted PDF");
        let mut bookmarks: Vec<(String, usize)> = parsed
            .bookmarks
            .map
            .values()
            .map(|bookmark| (bookmark.name.clone(), bookmark.page))
            .collect();
        bookmarks.sort_by(|a, b| (a.1, &a.0).cmp(&(b.1, &b.0)));
        assert_eq!(
            bookmarks,
            vec![
                ("README.md".to_string(), 2),
                ("src/".to_string(), 3),
                ("src/main.rs".to_string(), 3),
                ("src/util/".to_string(), 4),
                ("src/util/mod.rs".to_string(), 4),
            ]
        );
    }
}
