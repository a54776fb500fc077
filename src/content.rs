//! Reading files as text, with a swappable binary heuristic.

use crate::error::DumpError;
use crate::options::BinaryDetection;
use crate::types::SkipReason;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Bytes sniffed before deciding text vs binary.
pub const SAMPLE_SIZE: u64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

/// Decides whether a file should be dumped as text.
///
/// `sample` holds at most [`SAMPLE_SIZE`] leading bytes of the file.
pub trait ContentClassifier {
    fn classify(&self, path: &Path, sample: &[u8]) -> ContentKind;
}

impl ContentClassifier for BinaryDetection {
    fn classify(&self, _path: &Path, sample: &[u8]) -> ContentKind {
        let is_binary = match self {
            BinaryDetection::Simple => sample.contains(&0),
            BinaryDetection::Accurate => content_inspector::inspect(sample).is_binary(),
            BinaryDetection::None => false,
        };
        if is_binary {
            ContentKind::Binary
        } else {
            ContentKind::Text
        }
    }
}

/// Treats a file as text only when its extension is listed. Content is not
/// looked at.
#[derive(Debug, Clone)]
pub struct ExtensionAllowlist {
    extensions: Vec<String>,
}

impl ExtensionAllowlist {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

impl ContentClassifier for ExtensionAllowlist {
    fn classify(&self, path: &Path, _sample: &[u8]) -> ContentKind {
        let listed = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions.contains(&e));
        if listed {
            ContentKind::Text
        } else {
            ContentKind::Binary
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Text(String),
    Skipped(SkipReason),
}

/// Read `path` fully as UTF-8 text unless the classifier rejects it.
///
/// # Errors
///
/// Returns [`DumpError::Io`] when the file cannot be opened or read; callers
/// decide whether that is fatal.
pub fn read_text(
    path: &Path,
    classifier: &dyn ContentClassifier,
) -> Result<ReadOutcome, DumpError> {
    let file = File::open(path).map_err(|e| DumpError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::with_capacity(SAMPLE_SIZE as usize);
    reader
        .by_ref()
        .take(SAMPLE_SIZE)
        .read_to_end(&mut bytes)
        .map_err(|e| DumpError::io(path, e))?;
    if classifier.classify(path, &bytes) == ContentKind::Binary {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        return Ok(ReadOutcome::Skipped(SkipReason::Binary));
    }
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DumpError::io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(ReadOutcome::Text(text)),
        Err(_) => Ok(ReadOutcome::Skipped(SkipReason::NotUtf8)),
    }
}
