use crate::character_width::{calculate_lines_per_page, calculate_max_chars_per_line, PT_PER_IN};
use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lines at the top of every page reserved for the page header
pub const HEADER_LINES: usize = 2;

/// Narrowest usable page, in characters
const MIN_COLUMNS: usize = 24;
/// Fewest usable body lines per page
const MIN_BODY_LINES: usize = 4;

/// PDF output configuration.
///
/// Every field can be set from the `[pdf]` table of the configuration file;
/// missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PDF {
    /// Output PDF file path; defaults to `<repository>.pdf`
    pub outfile: Option<PathBuf>,
    /// Colour tokens by category
    pub highlight: bool,
    /// Show the line number gutter
    pub line_numbers: bool,
    /// Page width in inches
    pub page_width_in: f32,
    /// Page height in inches
    pub page_height_in: f32,
    /// Left and right margin in inches
    pub margin_horizontal_in: f32,
    /// Top and bottom margin in inches
    pub margin_vertical_in: f32,
    pub font_size_title_pt: f32,
    pub font_size_heading_pt: f32,
    pub font_size_body_pt: f32,
    pub font_size_small_pt: f32,
    /// Baseline to baseline distance of body text
    pub line_height_pt: f32,
}

impl Default for PDF {
    fn default() -> Self {
        PDF {
            outfile: None,
            highlight: true,
            line_numbers: true,
            page_width_in: 8.5,
            page_height_in: 11.0,
            margin_horizontal_in: 0.7,
            margin_vertical_in: 0.8,
            font_size_title_pt: 24.0,
            font_size_heading_pt: 14.0,
            font_size_body_pt: 9.0,
            font_size_small_pt: 8.0,
            line_height_pt: 12.0,
        }
    }
}

/// Page measurements derived from [`PDF`], shared by both layout stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_horizontal_pt: f32,
    pub margin_vertical_pt: f32,
    pub line_height_pt: f32,
    /// Characters per line of body text
    pub columns: usize,
    /// Body lines per page, after the header band
    pub body_lines: usize,
}

impl PDF {
    pub fn geometry(&self) -> Result<PageGeometry, RenderError> {
        let columns = calculate_max_chars_per_line(
            self.page_width_in,
            self.margin_horizontal_in,
            self.font_size_body_pt,
        );
        let lines = calculate_lines_per_page(
            self.page_height_in,
            self.margin_vertical_in,
            self.line_height_pt,
        );

        if columns < MIN_COLUMNS {
            return Err(RenderError::Layout(format!(
                "only {columns} characters fit on a line, need at least {MIN_COLUMNS}"
            )));
        }
        let body_lines = lines.saturating_sub(HEADER_LINES);
        if body_lines < MIN_BODY_LINES {
            return Err(RenderError::Layout(format!(
                "only {body_lines} lines fit on a page, need at least {MIN_BODY_LINES}"
            )));
        }

        Ok(PageGeometry {
            width_pt: self.page_width_in * PT_PER_IN,
            height_pt: self.page_height_in * PT_PER_IN,
            margin_horizontal_pt: self.margin_horizontal_in * PT_PER_IN,
            margin_vertical_pt: self.margin_vertical_in * PT_PER_IN,
            line_height_pt: self.line_height_pt,
            columns,
            body_lines,
        })
    }
}

/// Statistics from rendering a PDF, used for user feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Number of file sections
    pub file_count: usize,
    /// Source lines that didn't fit on one printed line
    pub wrapped_lines: usize,
    /// Files rendered with the unreadable placeholder
    pub unreadable_files: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_pdf() {
        let pdf = PDF::default();
        toml::to_string(&pdf).expect("can serialize PDF to TOML");
    }

    #[test]
    fn partial_tables_use_defaults() {
        let pdf: PDF = toml::from_str("highlight = false\nfont_size_body_pt = 10.0")
            .expect("can parse partial table");
        assert!(!pdf.highlight);
        assert!(pdf.line_numbers);
        assert_eq!(pdf.font_size_body_pt, 10.0);
        assert_eq!(pdf.page_width_in, 8.5);
    }

    #[test]
    fn default_geometry_is_letter() {
        let geometry = PDF::default().geometry().expect("default geometry is valid");
        assert_eq!(geometry.columns, 94);
        assert_eq!(geometry.body_lines, 54);
        assert_eq!(geometry.width_pt, 612.0);
        assert_eq!(geometry.height_pt, 792.0);
    }

    #[test]
    fn tiny_pages_are_rejected() {
        let pdf = PDF {
            page_width_in: 2.0,
            ..PDF::default()
        };
        assert!(matches!(pdf.geometry(), Err(RenderError::Layout(_))));
    }
}
