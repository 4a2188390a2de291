mod config;
mod emit;
mod layout;
mod rendering;

pub use config::{RenderStats, PDF};
pub use rendering::human_size;

use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::source::DocumentPlan;
use indicatif::ProgressBar;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What the cover page says about the document
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    /// Where the repository came from, a URL or a local path
    pub label: String,
    pub generated: String,
    pub file_count: usize,
    pub total_size: u64,
    /// Files left out because they couldn't be read or looked binary
    pub skipped_count: usize,
}

impl DocumentInfo {
    /// Describe `document`, stamped with the current local time
    pub fn describe<T: ToString, L: ToString>(
        title: T,
        label: L,
        document: &DocumentPlan,
    ) -> DocumentInfo {
        DocumentInfo {
            title: title.to_string(),
            label: label.to_string(),
            generated: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string(),
            file_count: document.files.len(),
            total_size: document.total_size(),
            skipped_count: document.warnings.len(),
        }
    }
}

impl PDF {
    /// The configured output path, or `<title>.pdf` in the working directory
    pub fn output_path(&self, title: &str) -> PathBuf {
        self.outfile
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{title}.pdf")))
    }

    /// Lay out and emit the document, writing it to `outfile`.
    ///
    /// Nothing is written unless layout succeeds.
    pub fn render(
        &self,
        document: &DocumentPlan,
        info: &DocumentInfo,
        highlighter: Option<&Highlighter>,
        outfile: &Path,
        progress: &ProgressBar,
    ) -> Result<RenderStats, RenderError> {
        let geometry = self.geometry()?;
        let (plan, stats) = self.plan(document, info, highlighter, progress)?;
        log::info!(
            "laid out {} page(s) for {} file(s)",
            stats.page_count,
            stats.file_count
        );

        for entry in plan.contents.iter() {
            log::debug!("{} starts on page {}", entry.path, entry.page);
        }

        progress.set_message("Writing PDF...");
        let bytes = emit::emit(self, &geometry, &plan);

        let write_err = |source| RenderError::Write {
            path: outfile.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(outfile).map_err(write_err)?;
        let mut file = std::io::BufWriter::new(file);
        file.write_all(&bytes).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        Ok(stats)
    }
}
