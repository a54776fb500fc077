//! Markdown mode: follow links outward from a seed note.
//!
//! The walk is depth-first in link order, driven by an explicit stack and a
//! set of canonical paths, so circular links terminate and each file is
//! emitted once.

use crate::content::{ContentClassifier, ReadOutcome, read_text};
use crate::engine::{canonical_dir, skip};
use crate::error::DumpError;
use crate::links::{LinkResolver, extract_links};
use crate::options::MarkdownOptions;
use crate::types::{Dump, OutputBlock, SkipReason, VisitRecord, display_path};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct Pending {
    path: PathBuf,
    depth: usize,
    via: Option<String>,
}

/// Traverse from the seed using the binary heuristic named in the options.
pub fn dump_markdown(options: MarkdownOptions) -> Result<Dump, DumpError> {
    let classifier = options.binary_detection;
    dump_markdown_with(options, &classifier)
}

/// Traverse from the seed with a caller-supplied content classifier.
///
/// # Errors
///
/// Fails when the seed is missing or cannot be read as text, or when the
/// base folder is not a directory. Linked files that cannot be read are
/// recorded in [`Dump::skipped`] instead.
pub fn dump_markdown_with(
    options: MarkdownOptions,
    classifier: &dyn ContentClassifier,
) -> Result<Dump, DumpError> {
    let seed = locate_seed(&options.start_file)?;
    let base = match &options.base_folder {
        Some(folder) => canonical_dir(folder)?,
        None => seed
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| DumpError::invalid(&seed, "has no parent folder"))?,
    };
    #[cfg(feature = "logging")]
    tracing::debug!(
        seed = %seed.display(),
        base = %base.display(),
        max_depth = options.max_depth,
        "starting markdown traversal"
    );
    let resolver = LinkResolver::new(&base);

    let mut dump = Dump::default();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack = vec![Pending {
        path: seed,
        depth: 0,
        via: None,
    }];

    while let Some(next) = stack.pop() {
        if !visited.insert(next.path.clone()) {
            continue;
        }
        let display = display_relative(&base, &next.path);
        let is_seed = next.depth == 0;
        let content = match read_text(&next.path, classifier) {
            Ok(ReadOutcome::Text(text)) => text,
            Ok(ReadOutcome::Skipped(reason)) if is_seed => {
                return Err(DumpError::invalid(&next.path, describe(&reason)));
            }
            Err(e) if is_seed => return Err(e),
            Ok(ReadOutcome::Skipped(reason)) => {
                skip(&mut dump, display, reason);
                continue;
            }
            Err(e) => {
                skip(&mut dump, display, SkipReason::Unreadable(e.to_string()));
                continue;
            }
        };

        if next.depth < options.max_depth && is_markdown(&next.path) {
            let doc_dir = next.path.parent().unwrap_or(&base);
            let children: Vec<Pending> = extract_links(&content, &next.path)
                .filter_map(|link| {
                    let target = link.target()?;
                    let Some(path) = resolver.resolve(target, doc_dir) else {
                        #[cfg(feature = "logging")]
                        tracing::trace!(
                            link = target,
                            from = %link.source.display(),
                            "unresolved link"
                        );
                        return None;
                    };
                    Some(Pending {
                        path,
                        depth: next.depth + 1,
                        via: Some(target.to_string()),
                    })
                })
                .filter(|p| !visited.contains(&p.path))
                .collect();
            // Reversed so the first link is popped first.
            stack.extend(children.into_iter().rev());
        }

        dump.blocks.push(OutputBlock::File {
            path: display,
            content,
        });
        dump.visits.push(VisitRecord {
            path: next.path,
            depth: next.depth,
            via: next.via,
        });
    }

    #[cfg(feature = "logging")]
    tracing::info!(
        files = dump.blocks.len(),
        skipped = dump.skipped.len(),
        "markdown traversal complete"
    );
    Ok(dump)
}

/// The seed as given, or with `.md` appended when only that exists.
fn locate_seed(start: &Path) -> Result<PathBuf, DumpError> {
    let mut path = start.to_path_buf();
    if !path.exists() && !start.to_string_lossy().ends_with(".md") {
        let mut with_ext = start.as_os_str().to_os_string();
        with_ext.push(".md");
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            path = with_ext;
        }
    }
    let meta = std::fs::metadata(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DumpError::InputNotFound { path: path.clone() },
        _ => DumpError::io(&path, e),
    })?;
    if !meta.is_file() {
        return Err(DumpError::invalid(&path, "not a file"));
    }
    path.canonicalize().map_err(|e| DumpError::io(&path, e))
}

fn display_relative(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => display_path(rel),
        Err(_) => path.display().to_string(),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
}

fn describe(reason: &SkipReason) -> String {
    match reason {
        SkipReason::Binary => "binary content".to_string(),
        SkipReason::NotUtf8 => "not valid UTF-8".to_string(),
        SkipReason::Unreadable(message) => message.clone(),
    }
}
