use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Repository URL (https, ssh, git, or user@host:path) or local directory
    pub source: String,

    /// Output PDF path [default: <repository>.pdf]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma separated extensions to include, replacing the defaults
    #[arg(long, value_delimiter = ',', value_name = "EXTS")]
    pub include_ext: Option<Vec<String>>,

    /// Comma separated directory names to skip, in addition to the defaults
    #[arg(long, value_delimiter = ',', value_name = "DIRS")]
    pub exclude_dirs: Vec<String>,

    /// Don't skip the default directories (.git, node_modules, target, ...)
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Skip files whose path relative to the repository matches this glob
    #[arg(long, value_name = "GLOB")]
    pub exclude_glob: Vec<String>,

    /// Skip files larger than this many KiB
    #[arg(long, value_name = "KB")]
    pub max_file_size_kb: Option<u64>,

    /// Render plain monochrome text
    #[arg(long)]
    pub no_highlight: bool,

    /// Leave out the line number gutter
    #[arg(long)]
    pub no_line_numbers: bool,

    /// Configuration file [default: repo2pdf.toml, if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// No logging or progress output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

pub fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "repo2pdf",
            "./repo",
            "--include-ext",
            "rs,.toml",
            "--exclude-dirs",
            "fixtures,docs",
            "--exclude-glob",
            "*.min.js",
            "--exclude-glob",
            "*.lock",
        ])
        .expect("can parse arguments");
        assert_eq!(cli.source, "./repo");
        assert_eq!(
            cli.include_ext,
            Some(vec!["rs".to_string(), ".toml".to_string()])
        );
        assert_eq!(cli.exclude_dirs, vec!["fixtures", "docs"]);
        assert_eq!(cli.exclude_glob, vec!["*.min.js", "*.lock"]);
        assert_eq!(cli.max_file_size_kb, None);
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["repo2pdf"]).is_err());
    }

    #[test]
    fn cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
