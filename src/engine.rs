//! Repository mode: tree header followed by every included text file.

use crate::content::{ContentClassifier, ReadOutcome, read_text};
use crate::error::DumpError;
use crate::ignore_rules::IgnoreRules;
use crate::options::RepoOptions;
use crate::tree::{render_entry, scan_tree};
use crate::types::{Dump, OutputBlock, SkipReason, SkippedFile, display_path};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dump a repository using the binary heuristic named in the options.
pub fn dump_repository(options: RepoOptions) -> Result<Dump, DumpError> {
    let classifier = options.binary_detection;
    dump_repository_with(options, &classifier)
}

/// Dump a repository with a caller-supplied content classifier.
///
/// # Errors
///
/// Fails when the root is missing, unreadable or not a directory, or when an
/// extra ignore glob does not compile. Per-file problems end up in
/// [`Dump::skipped`].
pub fn dump_repository_with(
    options: RepoOptions,
    classifier: &dyn ContentClassifier,
) -> Result<Dump, DumpError> {
    let root = canonical_dir(&options.root)?;
    #[cfg(feature = "logging")]
    tracing::debug!("Dumping repository at {}", root.display());
    let options = RepoOptions {
        root: root.clone(),
        ..options
    };
    let rules = Arc::new(IgnoreRules::load(&options)?);
    let tree = scan_tree(&root, &rules)?;

    let mut dump = Dump::default();
    dump.blocks.push(OutputBlock::Tree {
        text: render_entry(&tree),
    });
    for rel in tree.files() {
        let path = display_path(rel);
        match read_text(&root.join(rel), classifier) {
            Ok(ReadOutcome::Text(content)) => {
                dump.blocks.push(OutputBlock::File { path, content });
            }
            Ok(ReadOutcome::Skipped(reason)) => skip(&mut dump, path, reason),
            Err(e) => skip(&mut dump, path, SkipReason::Unreadable(e.to_string())),
        }
    }
    #[cfg(feature = "logging")]
    tracing::info!(
        files = dump.blocks.len() - 1,
        skipped = dump.skipped.len(),
        "repository dump complete"
    );
    Ok(dump)
}

pub(crate) fn skip(dump: &mut Dump, path: String, reason: SkipReason) {
    #[cfg(feature = "logging")]
    log_skip(&path, &reason);
    dump.skipped.push(SkippedFile { path, reason });
}

#[cfg(feature = "logging")]
fn log_skip(path: &str, reason: &SkipReason) {
    if let SkipReason::Unreadable(message) = reason {
        tracing::warn!("Error reading {}: {}", path, message);
    } else {
        tracing::debug!(path, ?reason, "skipping file content");
    }
}

/// Canonical form of a directory that must exist and be listable.
pub(crate) fn canonical_dir(path: &Path) -> Result<PathBuf, DumpError> {
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DumpError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => DumpError::io(path, e),
    })?;
    if !meta.is_dir() {
        return Err(DumpError::invalid(path, "not a directory"));
    }
    // The walker only warns about an unreadable root.
    std::fs::read_dir(path).map_err(|e| DumpError::io(path, e))?;
    path.canonicalize().map_err(|e| DumpError::io(path, e))
}
