//! Gitignore-style exclusion rules for repository mode.
//!
//! Every `.gitignore` under the root is compiled into its own matcher, anchored
//! at the directory that holds it. A path is checked against the matchers of
//! its ancestor directories, deepest first, and the first one with an opinion
//! decides. `!pattern` lines therefore re-include paths, and a nested file can
//! override its parent.

use crate::error::DumpError;
use crate::options::RepoOptions;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Component, Path, PathBuf};

/// Name of the per-directory pattern file.
pub const IGNORE_FILE: &str = ".gitignore";

/// Entries excluded no matter what the pattern files say.
const STRUCTURAL_ENTRIES: &[&str] = &[".git"];

#[derive(Debug)]
struct DirMatcher {
    /// Directory holding the pattern file, relative to the root.
    dir: PathBuf,
    matcher: Gitignore,
}

/// Answers "is this root-relative path excluded".
#[derive(Debug)]
pub struct IgnoreRules {
    root: PathBuf,
    /// Deepest directory first.
    matchers: Vec<DirMatcher>,
    extra: Option<GlobSet>,
    exclude: Option<PathBuf>,
}

impl IgnoreRules {
    /// Rules that only exclude the structural entries.
    pub fn structural(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            matchers: Vec::new(),
            extra: None,
            exclude: None,
        }
    }

    /// Discover the pattern files under `options.root` and compile them,
    /// together with the caller's extra globs.
    pub fn load(options: &RepoOptions) -> Result<Self, DumpError> {
        let mut rules = Self::structural(&options.root);
        rules.extra = build_glob_set(&options.ignore_patterns)?;
        rules.exclude = options
            .exclude_path
            .as_deref()
            .and_then(|p| relative_to_root(&options.root, p));
        if options.respect_gitignore {
            rules.matchers = discover_matchers(&options.root);
        }
        #[cfg(feature = "logging")]
        tracing::debug!(
            pattern_files = rules.matchers.len(),
            root = %options.root.display(),
            "ignore rules loaded"
        );
        Ok(rules)
    }

    /// Whether `rel` (relative to the root) is excluded. A path is also
    /// excluded when any of its ancestor directories is.
    pub fn is_excluded(&self, rel: &Path, is_dir: bool) -> bool {
        if rel.components().any(|c| is_structural(&c)) {
            return true;
        }
        if self.exclude.as_deref() == Some(rel) {
            return true;
        }
        let mut ancestors: Vec<&Path> = rel
            .ancestors()
            .skip(1)
            .filter(|a| !a.as_os_str().is_empty())
            .collect();
        ancestors.reverse();
        if ancestors.iter().any(|a| self.matches(a, true)) {
            return true;
        }
        self.matches(rel, is_dir)
    }

    fn matches(&self, rel: &Path, is_dir: bool) -> bool {
        if let Some(extra) = &self.extra
            && extra.is_match(rel)
        {
            return true;
        }
        let full = self.root.join(rel);
        for dm in &self.matchers {
            if rel == dm.dir || !rel.starts_with(&dm.dir) {
                continue;
            }
            let m = dm.matcher.matched(&full, is_dir);
            if m.is_ignore() {
                return true;
            }
            if m.is_whitelist() {
                return false;
            }
        }
        false
    }
}

fn is_structural(component: &Component<'_>) -> bool {
    match component {
        Component::Normal(name) => name.to_str().is_some_and(is_structural_name),
        _ => false,
    }
}

pub(crate) fn is_structural_name(name: &str) -> bool {
    STRUCTURAL_ENTRIES.contains(&name)
}

fn relative_to_root(root: &Path, path: &Path) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let parent = match parent {
        Some(p) => p.canonicalize().ok()?,
        None => std::env::current_dir().ok()?,
    };
    let full = parent.join(path.file_name()?);
    full.strip_prefix(&root).ok().map(Path::to_path_buf)
}

fn build_glob_set(patterns: &[String]) -> Result<Option<GlobSet>, DumpError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| DumpError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|e| DumpError::Pattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })?;
    Ok(Some(set))
}

fn discover_matchers(root: &Path) -> Vec<DirMatcher> {
    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(|entry| !entry.file_name().to_str().is_some_and(is_structural_name));

    let mut matchers = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::warn!(error = %_err, "unreadable entry while collecting ignore files");
                continue;
            }
        };
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if !is_file || entry.file_name().to_str() != Some(IGNORE_FILE) {
            continue;
        }
        let Some(dir) = entry.path().parent() else {
            continue;
        };
        if let Some(matcher) = compile_pattern_file(dir, entry.path()) {
            let rel = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();
            matchers.push(DirMatcher { dir: rel, matcher });
        }
    }
    matchers.sort_by(|a, b| b.dir.components().count().cmp(&a.dir.components().count()));
    matchers
}

/// Compile one pattern file. Bad lines are dropped; an unreadable file
/// yields no matcher at all.
fn compile_pattern_file(dir: &Path, file: &Path) -> Option<Gitignore> {
    let mut builder = GitignoreBuilder::new(dir);
    if let Some(_err) = builder.add(file) {
        #[cfg(feature = "logging")]
        tracing::warn!(file = %file.display(), error = %_err, "problem in ignore file");
    }
    match builder.build() {
        Ok(matcher) if !matcher.is_empty() => Some(matcher),
        Ok(_) => None,
        Err(_err) => {
            #[cfg(feature = "logging")]
            tracing::warn!(file = %file.display(), error = %_err, "ignoring unusable ignore file");
            None
        }
    }
}
