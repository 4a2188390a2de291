//! Error types for each stage of the pipeline.
//!
//! Source, filter configuration, and render errors are fatal and bubble up to
//! `main`. [`FileReadError`]s are per-file and only ever recorded as warnings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving the repository to a local directory
#[derive(Error, Debug)]
pub enum SourceError {
    /// Local path does not exist
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    /// Local path exists but isn't a directory
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Cloning the remote repository failed (network, not found, auth required)
    #[error("failed to fetch repository '{url}': {source}")]
    Fetch { url: String, source: git2::Error },

    /// Couldn't create the temporary checkout directory
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
}

/// Errors in user supplied filter options
#[derive(Error, Debug)]
pub enum FilterConfigError {
    #[error("invalid extension '{0}'")]
    InvalidExtension(String),

    #[error("invalid directory name '{0}'")]
    InvalidDirectory(String),

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("maximum file size must be positive and representable in bytes, got {0} KiB")]
    InvalidMaxSize(u64),
}

/// Errors reading a single file; never fatal
#[derive(Error, Debug)]
pub enum FileReadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{0}' looks like a binary file")]
    Binary(PathBuf),

    #[error("'{0}' is not valid UTF-8")]
    NotUtf8(PathBuf),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),
}

/// Errors producing the PDF
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no files matched the selected filters")]
    NoFiles,

    #[error("failed to load syntax highlighter: {0}")]
    Highlighter(String),

    #[error("page layout is too small: {0}")]
    Layout(String),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
