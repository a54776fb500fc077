//! Link extraction and resolution for markdown mode.
//!
//! Two syntaxes are recognised: wiki links (`[[Target]]`, `[[Target|Shown]]`)
//! and standard links (`[shown](target)`). Links inside code spans or fenced
//! blocks are extracted like any other text.

use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use crate::ignore_rules::is_structural_name;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(?P<wiki>.*?)\]\]|\[[^\]]*\]\((?P<target>[^)]+)\)").expect("valid regex")
});

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*://|(?i:mailto|tel|data|javascript):)")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Wiki,
    Standard,
}

/// A link as written in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReference<'a> {
    /// Text between the brackets (wiki) or parentheses (standard).
    pub raw: &'a str,
    pub kind: LinkKind,
    /// The document the link was found in.
    pub source: &'a Path,
}

impl<'a> LinkReference<'a> {
    /// The part that names a file: alias and `#fragment` removed, trimmed.
    /// `None` when nothing is left, e.g. for `[[#heading]]`.
    pub fn target(&self) -> Option<&'a str> {
        let target = match self.kind {
            LinkKind::Wiki => self.raw.split('|').next().unwrap_or_default(),
            LinkKind::Standard => self.raw,
        };
        let target = target.split('#').next().unwrap_or_default().trim();
        (!target.is_empty()).then_some(target)
    }
}

/// Iterator over the links of one document, in order of appearance.
///
/// Cloning it gives an independent cursor at the same position.
#[derive(Debug, Clone)]
pub struct Links<'a> {
    text: &'a str,
    source: &'a Path,
    pos: usize,
}

impl<'a> Iterator for Links<'a> {
    type Item = LinkReference<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.text.len() {
            return None;
        }
        let caps = LINK_RE.captures_at(self.text, self.pos)?;
        let whole = caps.get(0)?;
        self.pos = whole.end();
        let (raw, kind) = match (caps.name("wiki"), caps.name("target")) {
            (Some(m), _) => (m.as_str(), LinkKind::Wiki),
            (None, Some(m)) => (m.as_str(), LinkKind::Standard),
            (None, None) => return None,
        };
        Some(LinkReference {
            raw,
            kind,
            source: self.source,
        })
    }
}

/// Lazily extract the links of `text`, which was read from `source`.
pub fn extract_links<'a>(text: &'a str, source: &'a Path) -> Links<'a> {
    Links {
        text,
        source,
        pos: 0,
    }
}

/// Whether `target` is a URL: `scheme://...`, or one of the few schemes
/// written without slashes (`mailto:`, `tel:`, `data:`, `javascript:`).
/// Note titles such as `Meeting: notes` are left to the filesystem.
pub fn is_external(target: &str) -> bool {
    SCHEME_RE.is_match(target)
}

/// File names a link target may refer to: the target itself when it has an
/// extension, and the target with `.md` appended.
pub fn candidates(target: &str) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(2);
    if Path::new(target).extension().is_some() {
        out.push(PathBuf::from(target));
    }
    if !target.ends_with(".md") {
        out.push(PathBuf::from(format!("{target}.md")));
    }
    out
}

/// Maps link targets to files on disk.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    base: PathBuf,
}

impl LinkResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve `target` for a document living in `doc_dir`.
    ///
    /// Tries each candidate next to the document, then under the base
    /// folder, then anywhere below the base folder by trailing path
    /// components. Returns the canonical path of the first existing file.
    pub fn resolve(&self, target: &str, doc_dir: &Path) -> Option<PathBuf> {
        if is_external(target) {
            return None;
        }
        let candidates = candidates(target);
        for dir in [doc_dir, self.base.as_path()] {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() {
                    return path.canonicalize().ok();
                }
            }
        }
        candidates.iter().find_map(|c| self.search(c))
    }

    fn search(&self, candidate: &Path) -> Option<PathBuf> {
        let suffix = plain_components(candidate)?;
        let mut builder = WalkBuilder::new(&self.base);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| !entry.file_name().to_str().is_some_and(is_structural_name));
        builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .find(|entry| entry.path().ends_with(&suffix))
            .and_then(|entry| entry.path().canonicalize().ok())
    }
}

/// `candidate` without `./` prefixes; `None` if it climbs or is absolute.
fn plain_components(candidate: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}
