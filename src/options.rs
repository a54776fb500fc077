use serde::{Deserialize, Serialize};
use std::path::PathBuf;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// Null byte anywhere in the sampled prefix.
    Simple,
    /// `content_inspector` heuristics (BOMs, null bytes).
    Accurate,
    None,
}
/// Default link-following depth for markdown mode.
pub const DEFAULT_MAX_DEPTH: usize = 2;
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOptions {
    pub root: PathBuf,
    pub respect_gitignore: bool,
    pub ignore_patterns: Vec<String>,
    pub binary_detection: BinaryDetection,
    /// Path excluded from the walk when it lies under `root`, normally the output file.
    pub exclude_path: Option<PathBuf>,
}
impl Default for RepoOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            respect_gitignore: true,
            ignore_patterns: Vec::new(),
            binary_detection: BinaryDetection::Simple,
            exclude_path: None,
        }
    }
}
#[derive(Debug, Default)]
pub struct RepoDumpBuilder {
    options: RepoOptions,
}
impl RepoDumpBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: RepoOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn exclude_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.exclude_path = Some(path.into());
        self
    }
    pub fn build(self) -> RepoOptions {
        self.options
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownOptions {
    pub start_file: PathBuf,
    pub max_depth: usize,
    /// Folder links fall back to; the seed's folder when unset.
    pub base_folder: Option<PathBuf>,
    pub binary_detection: BinaryDetection,
}
impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            start_file: PathBuf::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            base_folder: None,
            binary_detection: BinaryDetection::Simple,
        }
    }
}
#[derive(Debug, Default)]
pub struct MarkdownDumpBuilder {
    options: MarkdownOptions,
}
impl MarkdownDumpBuilder {
    pub fn new(start_file: impl Into<PathBuf>) -> Self {
        Self {
            options: MarkdownOptions {
                start_file: start_file.into(),
                ..Default::default()
            },
        }
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }
    pub fn base_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.options.base_folder = folder;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn build(self) -> MarkdownOptions {
        self.options
    }
}
