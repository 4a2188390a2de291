//! Inclusion and exclusion rules for repository files.
//!
//! A [`FilterConfig`] is built once at startup from the default tables below,
//! optionally overridden by the configuration file and command line, and is
//! never mutated afterwards. Deciding whether a file is included is a pure
//! function of its relative path and size.

use crate::error::FilterConfigError;
use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Extensions included by default, lower-case and without the leading dot.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "go", "py", "js", "ts", "java", "c", "cpp", "h", "hpp", "rs", "rb", "php", "cs", "swift", "kt",
    "m", "scala", "sh", "yaml", "yml", "toml", "json", "md", "markdown", "rst", "txt", "jsx",
    "tsx", "mjs", "cjs", "vue", "svelte", "css", "scss", "html", "sql", "proto", "lua", "pl", "r",
    "dart", "ex", "exs", "erl", "hs", "ml", "zig", "nim", "cc", "hh", "cxx", "kts", "gradle",
    "bash", "zsh", "fish", "ps1", "cmake", "mk", "ini", "cfg",
];

/// Well known files that have no extension but are worth reading.
pub const DEFAULT_FILENAMES: &[&str] = &[
    "Makefile",
    "Dockerfile",
    "Jenkinsfile",
    "Rakefile",
    "Gemfile",
    "Procfile",
    "Justfile",
    "Vagrantfile",
    "LICENSE",
    "README",
];

/// Directory names that are never descended into.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "vendor",
    "dist",
    "build",
    "target",
    ".idea",
    ".vscode",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
];

pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 512;

/// Why a file was (or wasn't) included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Include,
    ExcludedDirectory,
    UnknownExtension,
    ExcludedGlob,
    TooLarge,
}

#[derive(Builder, Debug, Clone)]
#[builder(default)]
pub struct FilterConfig {
    /// Allowed extensions, lower-case, no leading dot
    #[builder(setter(each(name = "extension", into)))]
    pub extensions: BTreeSet<String>,
    /// Allowed file names for files without an extension
    #[builder(setter(each(name = "filename", into)))]
    pub filenames: BTreeSet<String>,
    /// Directory names which prune the whole subtree
    #[builder(setter(each(name = "exclude_dir", into)))]
    pub exclude_dirs: BTreeSet<String>,
    /// Globs matched against the path relative to the repository root
    pub exclude_globs: GlobSet,
    /// Files strictly larger than this many bytes are excluded
    pub max_file_size: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            filenames: DEFAULT_FILENAMES.iter().map(ToString::to_string).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(ToString::to_string).collect(),
            exclude_globs: GlobSet::empty(),
            max_file_size: DEFAULT_MAX_FILE_SIZE_KB * 1024,
        }
    }
}

impl FilterConfig {
    /// Whether a directory with this name is pruned from the walk
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }

    /// Decide whether the file at `relative` (to the repository root) with
    /// `size` bytes belongs in the document.
    pub fn decide(&self, relative: &Path, size: u64) -> Decision {
        let in_excluded_dir = relative
            .parent()
            .map(|parent| {
                parent.components().any(|component| match component {
                    Component::Normal(name) => name
                        .to_str()
                        .map(|name| self.is_excluded_dir(name))
                        .unwrap_or(false),
                    _ => false,
                })
            })
            .unwrap_or(false);
        if in_excluded_dir {
            return Decision::ExcludedDirectory;
        }

        let known = match relative.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self.extensions.contains(&ext.to_ascii_lowercase()),
            None => relative
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| self.filenames.contains(name))
                .unwrap_or(false),
        };
        if !known {
            return Decision::UnknownExtension;
        }

        if self.exclude_globs.is_match(relative) {
            return Decision::ExcludedGlob;
        }

        if size > self.max_file_size {
            return Decision::TooLarge;
        }

        Decision::Include
    }
}

/// Normalise a user supplied extension: trims whitespace, strips one leading
/// dot, and lower-cases it.
pub fn normalize_extension(raw: &str) -> Result<String, FilterConfigError> {
    let trimmed = raw.trim();
    let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if ext.is_empty()
        || ext.contains(['/', '\\', '.'])
        || ext.chars().any(char::is_whitespace)
    {
        return Err(FilterConfigError::InvalidExtension(raw.to_string()));
    }
    Ok(ext.to_ascii_lowercase())
}

/// Validate a directory name: a single path segment.
pub fn normalize_dir_name(raw: &str) -> Result<String, FilterConfigError> {
    let name = raw.trim().trim_end_matches('/');
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FilterConfigError::InvalidDirectory(raw.to_string()));
    }
    Ok(name.to_string())
}

/// Compile glob patterns into a single matcher.
pub fn compile_globs<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, FilterConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = Glob::new(pattern).map_err(|source| FilterConfigError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| FilterConfigError::InvalidGlob {
        pattern: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        source,
    })
}
