//! Configuration loading.
//!
//! Settings come from three layers: built-in defaults, an optional
//! `repo2pdf.toml` file, and command-line flags, each overriding the last.
//! Lists either replace the layer below (`include_ext`, `include_names`) or
//! extend it (`exclude_dirs`, `exclude_globs`).

use crate::cli::Cli;
use crate::error::FilterConfigError;
use crate::sinks::PDF;
use crate::source::{
    compile_globs, normalize_dir_name, normalize_extension, FilterConfig, FilterConfigBuilder,
    DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS, DEFAULT_FILENAMES, DEFAULT_MAX_FILE_SIZE_KB,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "repo2pdf.toml";

/// File selection settings, the `[filter]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Replaces the default extensions when set
    pub include_ext: Option<Vec<String>>,
    /// Replaces the default extensionless file names when set
    pub include_names: Option<Vec<String>>,
    /// Added to the default excluded directories
    pub exclude_dirs: Vec<String>,
    /// Drop the default excluded directories
    pub no_default_excludes: bool,
    pub exclude_globs: Vec<String>,
    pub max_file_size_kb: Option<u64>,
}

/// Complete configuration for a run.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    pub filter: FilterSettings,
    pub pdf: PDF,
}

impl Configuration {
    /// Load `path`, or `repo2pdf.toml` in the working directory if it exists,
    /// or fall back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Configuration> {
        let path: PathBuf = match path {
            Some(path) => path.to_path_buf(),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => PathBuf::from(DEFAULT_CONFIG_FILE),
            None => {
                log::debug!("no configuration file, using defaults");
                return Ok(Configuration::default());
            }
        };

        log::info!("loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {} as TOML", path.display()))?;
        Ok(config)
    }

    /// Layer command-line flags over the loaded configuration
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(extensions) = &cli.include_ext {
            self.filter.include_ext = Some(extensions.clone());
        }
        self.filter.exclude_dirs.extend(cli.exclude_dirs.iter().cloned());
        self.filter.no_default_excludes |= cli.no_default_excludes;
        self.filter.exclude_globs.extend(cli.exclude_glob.iter().cloned());
        if cli.max_file_size_kb.is_some() {
            self.filter.max_file_size_kb = cli.max_file_size_kb;
        }

        if cli.output.is_some() {
            self.pdf.outfile = cli.output.clone();
        }
        if cli.no_highlight {
            self.pdf.highlight = false;
        }
        if cli.no_line_numbers {
            self.pdf.line_numbers = false;
        }
    }
}

impl FilterSettings {
    /// Validate the settings and combine them with the defaults
    pub fn build(&self) -> Result<FilterConfig, FilterConfigError> {
        let extensions = match &self.include_ext {
            Some(extensions) => extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect::<Result<BTreeSet<String>, _>>()?,
            None => DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        };

        let filenames: BTreeSet<String> = match &self.include_names {
            Some(names) => names.iter().map(|name| name.trim().to_string()).collect(),
            None => DEFAULT_FILENAMES.iter().map(ToString::to_string).collect(),
        };

        let mut exclude_dirs: BTreeSet<String> = if self.no_default_excludes {
            BTreeSet::default()
        } else {
            DEFAULT_EXCLUDE_DIRS.iter().map(ToString::to_string).collect()
        };
        for dir in self.exclude_dirs.iter() {
            exclude_dirs.insert(normalize_dir_name(dir)?);
        }

        let max_file_size_kb = self.max_file_size_kb.unwrap_or(DEFAULT_MAX_FILE_SIZE_KB);
        let max_file_size = match max_file_size_kb.checked_mul(1024) {
            Some(bytes) if bytes > 0 => bytes,
            _ => return Err(FilterConfigError::InvalidMaxSize(max_file_size_kb)),
        };

        let filter = FilterConfigBuilder::default()
            .extensions(extensions)
            .filenames(filenames)
            .exclude_dirs(exclude_dirs)
            .exclude_globs(compile_globs(self.exclude_globs.as_slice())?)
            .max_file_size(max_file_size)
            .build()
            .expect("every filter field is set");

        log::debug!(
            "filtering on {} extension(s), {} excluded dir(s), {} glob(s), max {} KiB",
            filter.extensions.len(),
            filter.exclude_dirs.len(),
            self.exclude_globs.len(),
            max_file_size_kb
        );
        Ok(filter)
    }
}
