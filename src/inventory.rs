//! Directory traversal: the markdown file set and the asset inventory.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;

/// Every file under a root, keyed by bare filename. A name maps to all the
/// root-relative paths that carry it, so the validator can distinguish
/// "name exists somewhere else" from "name absent entirely". Built once per
/// run; lookups only.
pub struct AssetInventory {
    by_name: HashMap<String, Vec<PathBuf>>,
    total_files: usize,
}

impl AssetInventory {
    /// Walk `root` and index every file that passes the config filter.
    /// Unreadable directory entries are skipped, not fatal.
    pub fn build(root: &Path, config: &Config) -> Self {
        let mut by_name: HashMap<String, Vec<PathBuf>> = HashMap::new();
        let mut total_files = 0;

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let relative = root_relative(entry.path(), root);
            if !config.should_scan(&relative.to_string_lossy()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            by_name.entry(name).or_default().push(relative);
            total_files += 1;
        }

        Self { by_name, total_files }
    }

    /// Build an inventory directly from name → paths entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<PathBuf>)>) -> Self {
        let by_name: HashMap<String, Vec<PathBuf>> = entries.into_iter().collect();
        let total_files = by_name.values().map(Vec::len).sum();
        Self { by_name, total_files }
    }

    /// All root-relative paths carrying the given bare filename.
    pub fn candidates(&self, name: &str) -> Option<&[PathBuf]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    /// Number of files indexed.
    pub fn total_files(&self) -> usize {
        self.total_files
    }
}

/// List the markdown files under `root` that pass the config filter, in a
/// stable traversal order. Paths are absolute.
pub fn markdown_files(root: &Path, config: &Config) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter(|e| {
            let relative = root_relative(e.path(), root);
            config.should_scan(&relative.to_string_lossy())
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Relativize a path against the root, returning it unchanged when it isn't
/// under the root.
pub fn root_relative(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Resolve `.` and `..` segments lexically, never consulting the
/// filesystem. A `..` with nothing left to climb out of stays in place, so
/// paths escaping the root keep their leading parent segments.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut stack: Vec<Component<'_>> = Vec::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => match stack.last() {
                None | Some(Component::ParentDir) => stack.push(part),
                Some(_) => {
                    stack.pop();
                }
            },
            _ => stack.push(part),
        }
    }
    stack.iter().collect()
}

/// Express `target` relative to `from_dir`, both root-relative: climb out
/// of the directories `from_dir` doesn't share with the target, then walk
/// down the target's remaining segments. Purely lexical.
pub fn relative_to(target: &Path, from_dir: &Path) -> PathBuf {
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let from_parts: Vec<Component<'_>> = from_dir.components().collect();
    let shared = target_parts
        .iter()
        .zip(&from_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..from_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[shared..] {
        relative.push(part);
    }
    relative
}
