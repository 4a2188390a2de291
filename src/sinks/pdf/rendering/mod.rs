//! Page layout, the first of the two rendering stages.
//!
//! Produces a [`PagePlan`] holding the text of every page in document order:
//!
//! 1. the cover page
//! 2. the directory listing
//! 3. the table of contents
//! 4. one section per file, each starting on a fresh page
//!
//! Contents entries are never wrapped, so the number of contents pages is
//! known up front from the file count alone. Section start pages can then be
//! resolved in a single pass over the laid out sections, and the contents are
//! filled in afterwards.

mod directory_listing;
mod header_footer;
mod source_file;
mod table_of_contents;
mod title_page;

pub use header_footer::footer_text;
pub use title_page::human_size;

use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::sinks::pdf::config::{PageGeometry, RenderStats, PDF};
use crate::sinks::pdf::layout::{LaidOutPage, PagePlan, TocEntry};
use crate::sinks::pdf::DocumentInfo;
use crate::source::DocumentPlan;
use indicatif::ProgressBar;

/// Characters of heading text which fit across the page
pub fn heading_columns(config: &PDF, geometry: &PageGeometry) -> usize {
    ((geometry.columns as f32) * config.font_size_body_pt / config.font_size_heading_pt) as usize
}

impl PDF {
    /// Lay out every page of the document without producing any PDF.
    ///
    /// The progress bar is advanced once per file section.
    pub fn plan(
        &self,
        document: &DocumentPlan,
        info: &DocumentInfo,
        highlighter: Option<&Highlighter>,
        progress: &ProgressBar,
    ) -> Result<(PagePlan, RenderStats), RenderError> {
        if document.files.is_empty() {
            return Err(RenderError::NoFiles);
        }

        let geometry = self.geometry()?;
        let heading_columns = heading_columns(self, &geometry);

        let cover = title_page::render(self, &geometry, info);
        let listing = directory_listing::render(&geometry, &document.tree);
        let toc_pages = table_of_contents::page_count(document.files.len(), &geometry);
        log::debug!(
            "{} listing page(s), {toc_pages} contents page(s)",
            listing.len()
        );

        // 1-based, after the cover, listing and contents
        let mut next_page = 1 + listing.len() + toc_pages + 1;
        let mut contents: Vec<TocEntry> = Vec::with_capacity(document.files.len());
        let mut section_pages: Vec<LaidOutPage> = Vec::default();
        let mut wrapped_lines = 0;
        let mut unreadable_files = 0;

        for file in document.files.iter() {
            progress.set_message(file.display_path());
            let section = source_file::render(self, &geometry, heading_columns, file, highlighter);

            contents.push(TocEntry {
                path: file.display_path(),
                page: next_page,
            });
            next_page += section.pages.len();
            wrapped_lines += section.wrapped_lines;
            if section.unreadable {
                unreadable_files += 1;
            }
            section_pages.extend(section.pages);
            progress.inc(1);
        }

        let toc = table_of_contents::render(&geometry, &contents);
        if toc.len() != toc_pages {
            return Err(RenderError::Layout(format!(
                "expected {toc_pages} contents page(s), laid out {}",
                toc.len()
            )));
        }

        let mut pages: Vec<LaidOutPage> = Vec::with_capacity(next_page - 1);
        pages.push(cover);
        pages.extend(listing);
        pages.extend(toc);
        pages.extend(section_pages);

        let stats = RenderStats {
            page_count: pages.len(),
            file_count: document.files.len(),
            wrapped_lines,
            unreadable_files,
        };

        Ok((
            PagePlan {
                title: info.title.clone(),
                pages,
                contents,
            },
            stats,
        ))
    }
}
