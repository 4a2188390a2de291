use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// A file that passed the filter and will get its own section in the document
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the repository root
    pub relative: PathBuf,
    /// Path on disk
    pub absolute: PathBuf,
    /// Size in bytes at walk time
    pub size: u64,
    /// Language token used to look up a highlighter: the lower-cased extension,
    /// or the file name for extensionless files such as `Makefile`
    pub language: String,
}

impl FileEntry {
    pub fn new<P: Into<PathBuf>>(root: &Path, relative: P, size: u64) -> FileEntry {
        let relative: PathBuf = relative.into();
        let absolute = root.join(&relative);
        let language = detect_language(&relative);
        FileEntry {
            relative,
            absolute,
            size,
            language,
        }
    }

    /// The relative path with `/` separators regardless of platform
    pub fn display_path(&self) -> String {
        display_path(&self.relative)
    }
}

pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn detect_language(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

impl PartialOrd for FileEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.relative.cmp(&other.relative)
    }
}
