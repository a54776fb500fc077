use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A node of the included file tree, relative to the dump root.
///
/// Directory entries own their children, already filtered and sorted
/// (directories first, then files, each group by file name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Path relative to the dump root. Empty for the root itself.
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Vec<PathEntry>,
}

impl PathEntry {
    pub(crate) fn file(path: PathBuf) -> Self {
        Self {
            path,
            is_dir: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn dir(path: PathBuf, children: Vec<PathEntry>) -> Self {
        Self {
            path,
            is_dir: true,
            children,
        }
    }

    /// The last path component, or an empty string for the root.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Included files below this entry, depth-first in tree order.
    pub fn files(&self) -> Vec<&Path> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a Path>) {
        if !self.is_dir {
            out.push(&self.path);
            return;
        }
        for child in &self.children {
            child.collect_files(out);
        }
    }
}

/// One unit of serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputBlock {
    /// The rendered file tree. Written without start/end markers.
    Tree { text: String },
    /// One file's content, framed by start/end markers.
    File { path: String, content: String },
}

/// A file visited by the markdown traverser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Canonical absolute path.
    pub path: PathBuf,
    pub depth: usize,
    /// Link target text that led here; `None` for the seed.
    pub via: Option<String>,
}

/// Why a file's content was left out of the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Binary,
    NotUtf8,
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// The ordered result of either dumper.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dump {
    pub blocks: Vec<OutputBlock>,
    pub skipped: Vec<SkippedFile>,
    /// Markdown mode only; empty for repository dumps.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub visits: Vec<VisitRecord>,
}

impl Dump {
    /// Display paths of the file blocks, in output order.
    pub fn file_paths(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                OutputBlock::File { path, .. } => Some(path.as_str()),
                OutputBlock::Tree { .. } => None,
            })
            .collect()
    }

    /// The rendered tree, if this dump has one.
    pub fn tree(&self) -> Option<&str> {
        self.blocks.iter().find_map(|block| match block {
            OutputBlock::Tree { text } => Some(text.as_str()),
            OutputBlock::File { .. } => None,
        })
    }
}

/// Root-relative display form with `/` separators.
pub(crate) fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
