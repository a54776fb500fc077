//! Internal module for collecting the included paths and drawing them as a tree.

use crate::error::DumpError;
use crate::ignore_rules::IgnoreRules;
use crate::types::PathEntry;
use ignore::WalkBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

#[derive(Debug, Default)]
struct Node {
    dirs: BTreeMap<OsString, Node>,
    files: BTreeSet<OsString>,
}

impl Node {
    fn insert(&mut self, rel: &Path, is_dir: bool) {
        let mut node = self;
        let mut parts = rel.iter().peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() && !is_dir {
                node.files.insert(part.to_os_string());
                return;
            }
            node = node.dirs.entry(part.to_os_string()).or_default();
        }
    }

    /// Directories first, then files; each group in byte order of the name.
    /// Directories without an included file below them are dropped.
    fn into_entry(self, path: PathBuf) -> Option<PathEntry> {
        let mut children: Vec<PathEntry> = self
            .dirs
            .into_iter()
            .filter_map(|(name, node)| node.into_entry(path.join(name)))
            .collect();
        children.extend(
            self.files
                .into_iter()
                .map(|name| PathEntry::file(path.join(name))),
        );
        if children.is_empty() && !path.as_os_str().is_empty() {
            return None;
        }
        Some(PathEntry::dir(path, children))
    }
}

/// Walk `root` and collect every path the rules let through.
///
/// Unreadable directories are logged and left out; only an unreadable root
/// is an error.
pub fn scan_tree(root: &Path, rules: &Arc<IgnoreRules>) -> Result<PathEntry, DumpError> {
    let meta = std::fs::metadata(root).map_err(|e| DumpError::io(root, e))?;
    if !meta.is_dir() {
        return Err(DumpError::invalid(root, "not a directory"));
    }
    std::fs::read_dir(root).map_err(|e| DumpError::io(root, e))?;

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).follow_links(false);
    let filter_root = root.to_path_buf();
    let filter_rules = Arc::clone(rules);
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 {
            return true;
        }
        let rel = entry.path().strip_prefix(&filter_root).unwrap_or(entry.path());
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        !filter_rules.is_excluded(rel, is_dir)
    });

    let mut top = Node::default();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::warn!(error = %_err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        // Links to directories are not followed.
        if file_type.is_symlink() && entry.path().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        top.insert(rel, file_type.is_dir());
    }

    Ok(top
        .into_entry(PathBuf::new())
        .unwrap_or_else(|| PathEntry::dir(PathBuf::new(), Vec::new())))
}

/// Draw the children of `root` with box-drawing connectors. The root itself
/// is not printed.
pub fn render_entry(root: &PathEntry) -> String {
    let mut lines = Vec::new();
    render_children(&root.children, "", &mut lines);
    lines.join("\n")
}

fn render_children(children: &[PathEntry], prefix: &str, lines: &mut Vec<String>) {
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        let connector = if is_last { CORNER } else { BRANCH };
        lines.push(format!("{prefix}{connector}{}", child.name()));
        if child.is_dir {
            let next = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
            render_children(&child.children, &next, lines);
        }
    }
}

/// Scan and render in one step.
pub fn render_tree(root: &Path, rules: &Arc<IgnoreRules>) -> Result<String, DumpError> {
    Ok(render_entry(&scan_tree(root, rules)?))
}
