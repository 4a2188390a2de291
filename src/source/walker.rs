//! Repository traversal.
//!
//! Walks the resolved repository depth-first with entries sorted by name,
//! pruning excluded directories before they are descended into. Produces the
//! [`DocumentPlan`]: the ordered list of files to render, the directory tree
//! for the listing pages, and any per-file problems encountered on the way.

use crate::error::FileReadError;
use crate::source::{Decision, FileEntry, FilterConfig};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Component, Path};

/// How many leading bytes are checked for a null byte when sniffing binaries.
const SNIFF_LEN: u64 = 8 * 1024;

/// A file shown in the directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub name: String,
    /// Whether the file made it into the document
    pub included: bool,
}

/// The repository's directory structure with excluded directories pruned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirTree {
    pub name: String,
    pub dirs: BTreeMap<String, DirTree>,
    pub files: Vec<TreeFile>,
}

impl DirTree {
    pub fn new<S: ToString>(name: S) -> DirTree {
        DirTree {
            name: name.to_string(),
            ..DirTree::default()
        }
    }

    fn dir_mut(&mut self, components: &[String]) -> &mut DirTree {
        let mut node = self;
        for name in components {
            node = node
                .dirs
                .entry(name.clone())
                .or_insert_with(|| DirTree::new(name));
        }
        node
    }

    pub fn insert_dir(&mut self, components: &[String]) {
        self.dir_mut(components);
    }

    pub fn insert_file(&mut self, dirs: &[String], name: String, included: bool) {
        self.dir_mut(dirs).files.push(TreeFile { name, included });
    }

    /// Total number of files in the tree, included or not
    pub fn file_count(&self) -> usize {
        self.files.len() + self.dirs.values().map(DirTree::file_count).sum::<usize>()
    }
}

/// Everything the renderer needs, built once by [`walk`]
#[derive(Debug, Default)]
pub struct DocumentPlan {
    /// Files to render, in document order
    pub files: Vec<FileEntry>,
    pub tree: DirTree,
    /// Files that were skipped because they couldn't be read or looked binary
    pub warnings: Vec<FileReadError>,
}

impl DocumentPlan {
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|file| file.size).sum()
    }
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Check the first few KiB for a null byte
fn looks_binary(path: &Path) -> Result<bool, FileReadError> {
    let io_err = |source| FileReadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_err)?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut head)
        .map_err(io_err)?;
    Ok(head.contains(&0))
}

/// Walk the repository at `root` and collect the files which pass `filter`.
///
/// Problems with individual entries (permissions, broken symlinks, binary
/// contents) are recorded in [`DocumentPlan::warnings`] rather than returned.
pub fn walk(root: &Path, filter: &FilterConfig) -> DocumentPlan {
    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    let mut tree = DirTree::new(root_name);
    let mut files: Vec<FileEntry> = Vec::default();
    let mut warnings: Vec<FileReadError> = Vec::default();

    let pruned = filter.clone();
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            let excluded = entry.depth() > 0
                && is_dir
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| pruned.is_excluded_dir(name))
                    .unwrap_or(false);
            if excluded {
                log::debug!("pruning directory {}", entry.path().display());
            }
            !excluded
        });

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping entry: {e}");
                warnings.push(FileReadError::Walk(e));
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };
        let mut components = normal_components(&relative);
        let Some(name) = components.pop() else {
            continue;
        };

        let file_type = entry.file_type();
        if file_type.map(|ft| ft.is_dir()).unwrap_or(false) {
            components.push(name);
            tree.insert_dir(&components);
            continue;
        }

        // follows symlinks, so broken links surface here
        let metadata = match std::fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(source) => {
                log::warn!("skipping unreadable {}: {source}", relative.display());
                warnings.push(FileReadError::Io {
                    path: relative,
                    source,
                });
                continue;
            }
        };
        if !metadata.is_file() {
            log::debug!("skipping non-file entry {}", relative.display());
            continue;
        }

        let size = metadata.len();
        let included = match filter.decide(&relative, size) {
            Decision::Include => match looks_binary(entry.path()) {
                Ok(false) => true,
                Ok(true) => {
                    log::warn!("skipping binary file {}", relative.display());
                    warnings.push(FileReadError::Binary(relative.clone()));
                    false
                }
                Err(e) => {
                    log::warn!("skipping {e}");
                    warnings.push(e);
                    false
                }
            },
            decision => {
                log::debug!("excluding {}: {decision:?}", relative.display());
                false
            }
        };

        tree.insert_file(&components, name, included);
        if included {
            files.push(FileEntry::new(root, relative, size));
        }
    }

    files.sort();

    DocumentPlan {
        files,
        tree,
        warnings,
    }
}
