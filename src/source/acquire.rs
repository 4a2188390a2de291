//! Resolving the user's input into a local directory.
//!
//! Remote repositories are shallow-cloned into a temporary directory owned by
//! the returned [`ResolvedSource`]; dropping it removes the checkout, so the
//! clone is cleaned up on every exit path. Local paths are used in place.

use crate::error::SourceError;
use git2::build::RepoBuilder;
use git2::{FetchOptions, RemoteCallbacks};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REMOTE_SCHEMES: &[&str] = &["http://", "https://", "ssh://", "git://"];

/// Where the repository comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    Remote(String),
    Local(PathBuf),
}

/// A repository that is available on the local filesystem
#[derive(Debug)]
pub struct ResolvedSource {
    /// Directory to walk
    pub root: PathBuf,
    /// Human readable description of where the repository came from
    pub label: String,
    /// Short repository name used for the document title
    pub title: String,
    /// Keeps a temporary clone alive; removed on drop
    checkout: Option<TempDir>,
}

impl ResolvedSource {
    /// Whether the repository was cloned into a temporary directory
    pub fn is_temporary(&self) -> bool {
        self.checkout.is_some()
    }
}

/// Does `input` look like something git can clone, rather than a local path?
pub fn is_remote_url(input: &str) -> bool {
    if REMOTE_SCHEMES.iter().any(|scheme| input.starts_with(scheme)) {
        return true;
    }

    // scp-like syntax: user@host:owner/repo.git
    match input.split_once(':') {
        Some((head, rest)) => {
            head.contains('@') && !head.contains(['/', '\\']) && !rest.is_empty()
        }
        None => false,
    }
}

/// The last meaningful segment of a URL, without any `.git` suffix
pub fn title_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or_default();
    let last = last.strip_suffix(".git").unwrap_or(last);
    if last.is_empty() {
        "repository".to_string()
    } else {
        last.to_string()
    }
}

impl RepoSource {
    pub fn parse(input: &str) -> RepoSource {
        if is_remote_url(input) {
            RepoSource::Remote(input.to_string())
        } else {
            RepoSource::Local(PathBuf::from(input))
        }
    }

    /// Make the repository available locally.
    ///
    /// `progress` receives object counts while a remote clone is in flight and
    /// is left untouched for local paths.
    pub fn resolve(&self, progress: &ProgressBar) -> Result<ResolvedSource, SourceError> {
        match self {
            RepoSource::Remote(url) => clone_remote(url, &std::env::temp_dir(), progress),
            RepoSource::Local(path) => open_local(path),
        }
    }
}

fn open_local(path: &Path) -> Result<ResolvedSource, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(SourceError::NotADirectory(path.to_path_buf()));
    }
    let root = path
        .canonicalize()
        .map_err(|_| SourceError::NotFound(path.to_path_buf()))?;

    let title = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "repository".to_string());

    log::info!("using local repository at {}", root.display());
    Ok(ResolvedSource {
        label: root.display().to_string(),
        root,
        title,
        checkout: None,
    })
}

/// Shallow-clone `url` into a fresh `repo2pdf-*` directory under `parent`
fn clone_remote(
    url: &str,
    parent: &Path,
    progress: &ProgressBar,
) -> Result<ResolvedSource, SourceError> {
    let checkout = tempfile::Builder::new()
        .prefix("repo2pdf-")
        .tempdir_in(parent)
        .map_err(SourceError::TempDir)?;
    let root = checkout.path().join("repo");

    log::info!("cloning {url} into {}", root.display());
    progress.set_message(format!("Cloning {url}..."));

    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|stats| {
        progress.set_length(stats.total_objects() as u64);
        progress.set_position(stats.received_objects() as u64);
        true
    });

    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks);
    fetch.depth(1);

    RepoBuilder::new()
        .fetch_options(fetch)
        .clone(url, &root)
        .map_err(|source| SourceError::Fetch {
            url: url.to_string(),
            source,
        })?;

    progress.finish_and_clear();

    Ok(ResolvedSource {
        root,
        label: url.to_string(),
        title: title_from_url(url),
        checkout: Some(checkout),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_detect_remote_urls() {
        assert!(is_remote_url("https://github.com/rust-lang/rust"));
        assert!(is_remote_url("http://example.com/repo.git"));
        assert!(is_remote_url("ssh://git@example.com/repo.git"));
        assert!(is_remote_url("git@github.com:rust-lang/rust.git"));
        assert!(!is_remote_url("./some/path"));
        assert!(!is_remote_url("/home/user/repo"));
        assert!(!is_remote_url("C:\\Users\\me\\repo"));
        assert!(!is_remote_url("weird@dir/with:colon"));
    }

    #[test]
    fn can_derive_titles_from_urls() {
        assert_eq!(title_from_url("https://github.com/rust-lang/rust"), "rust");
        assert_eq!(title_from_url("https://github.com/owner/tool.git/"), "tool");
        assert_eq!(title_from_url("git@github.com:owner/lib.git"), "lib");
        assert_eq!(title_from_url("https://"), "repository");
    }

    #[test]
    fn missing_local_paths_are_not_found() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let missing = dir.path().join("nope");
        let err = RepoSource::parse(missing.to_str().expect("utf-8 path"))
            .resolve(&ProgressBar::hidden())
            .expect_err("path doesn't exist");
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn local_files_are_not_directories() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "hello").expect("can write file");
        let err = RepoSource::Local(file)
            .resolve(&ProgressBar::hidden())
            .expect_err("path is a file");
        assert!(matches!(err, SourceError::NotADirectory(_)));
    }

    #[test]
    fn local_directories_resolve_in_place() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let repo = dir.path().join("my-project");
        std::fs::create_dir(&repo).expect("can create dir");

        let resolved = RepoSource::Local(repo.clone())
            .resolve(&ProgressBar::hidden())
            .expect("can resolve local dir");
        assert_eq!(resolved.title, "my-project");
        assert_eq!(resolved.root, repo.canonicalize().expect("can canonicalize"));
        assert!(!resolved.is_temporary());
    }

    fn checkouts_in(parent: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(parent)
            .expect("can list temp dir")
            .map(|entry| entry.expect("can read entry").path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with("repo2pdf-"))
                    .unwrap_or(false)
            })
            .collect()
    }

    #[test]
    fn failed_clones_report_fetch_errors() {
        let parent = tempfile::tempdir().expect("can create temp dir");
        let url = "file:///definitely/not/a/repository";
        let err = clone_remote(url, parent.path(), &ProgressBar::hidden()).expect_err("clone fails");
        assert!(matches!(err, SourceError::Fetch { .. }));
        assert!(checkouts_in(parent.path()).is_empty());
    }

    #[test]
    fn dropping_a_temporary_checkout_removes_it() {
        let parent = tempfile::tempdir().expect("can create temp dir");
        let checkout = tempfile::Builder::new()
            .prefix("repo2pdf-")
            .tempdir_in(parent.path())
            .expect("can create checkout dir");
        let root = checkout.path().join("repo");
        std::fs::create_dir_all(root.join("src")).expect("can create dirs");
        std::fs::write(root.join("src/main.rs"), "fn main() {}\n").expect("can write file");

        let resolved = ResolvedSource {
            root: root.clone(),
            label: "https://example.com/owner/repo".to_string(),
            title: "repo".to_string(),
            checkout: Some(checkout),
        };
        assert!(resolved.is_temporary());
        assert_eq!(checkouts_in(parent.path()).len(), 1);

        drop(resolved);
        assert!(!root.exists());
        assert!(checkouts_in(parent.path()).is_empty());
    }
}
