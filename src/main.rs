use anyhow::{Context, Result};
use cli::Cli;
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use source::RepoSource;
use std::process::ExitCode;
use std::time::Duration;

mod character_width;
mod cli;
mod config;
mod error;
mod highlight;
mod sinks {
    mod pdf;
    pub use pdf::{human_size, DocumentInfo, PDF};
}
mod source;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();
    cli::setup_logging(cli.quiet, cli.verbose);
    log::debug!("CLI args parsed: {cli:?}");

    let mut config = Configuration::load(cli.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    config.apply(&cli);
    let Configuration { filter, pdf } = config;

    let filter = filter
        .build()
        .with_context(|| "Invalid filter settings")?;

    let spinner = progress_bar(cli.quiet);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let repo = RepoSource::parse(&cli.source)
        .resolve(&spinner)
        .with_context(|| format!("Failed to open repository '{}'", cli.source))?;
    spinner.finish_and_clear();

    let document = source::walk(&repo.root, &filter);
    log::info!(
        "{} of {} file(s) selected, {} skipped",
        document.files.len(),
        document.tree.file_count(),
        document.warnings.len()
    );

    let highlighter = if pdf.highlight {
        Some(highlight::Highlighter::new().with_context(|| "Failed to prepare highlighter")?)
    } else {
        None
    };

    let info = sinks::DocumentInfo::describe(&repo.title, &repo.label, &document);
    let outfile = pdf.output_path(&repo.title);

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(document.files.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Rendering PDF...");

    let stats = pdf
        .render(&document, &info, highlighter.as_ref(), &outfile, &progress)
        .with_context(|| "Failed to render PDF")?;
    progress.finish_and_clear();

    if !cli.quiet {
        println!("PDF created: {}", outfile.display());
        println!(
            "  {} file(s), {}, {} page(s)",
            stats.file_count,
            sinks::human_size(document.total_size()),
            stats.page_count
        );
        if stats.wrapped_lines > 0 {
            println!("  {} long line(s) wrapped", stats.wrapped_lines);
        }
        if stats.unreadable_files > 0 || !document.warnings.is_empty() {
            println!(
                "  {} file(s) unreadable, {} skipped",
                stats.unreadable_files,
                document.warnings.len()
            );
        }
    }

    if repo.is_temporary() {
        log::debug!("removing temporary checkout {}", repo.root.display());
    }
    Ok(())
}
