use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Input not found: {}", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("Invalid input {}: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot write output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
impl DumpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DumpError::Io {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DumpError::Output {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DumpError::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
