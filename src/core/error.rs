//! Error types shared by the parser, the source loader and the viewer

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the Markball API.
///
/// Parsing itself never fails; these cover lookups, loading sources and
/// writing presentation output.
#[derive(Debug, Error)]
pub enum MarkballError {
    /// A fence id outside `[0, len)` was requested.
    #[error("Fence id {index} is out of range (document has {len} fences)")]
    IndexOutOfRange { index: usize, len: usize },

    /// No fence carries the requested identifier.
    #[error("No fence named '{0}'")]
    FenceNotFound(String),

    /// Source content looks binary (NUL bytes in the header).
    #[error("Source {0} appears to be binary")]
    BinaryInput(String),

    /// Source is not valid UTF-8 and strict decoding was requested.
    #[error("Source {0} is not valid UTF-8")]
    InvalidEncoding(String),

    /// Source exceeds the configured size limit.
    #[error("Source {path} is too large ({size} > {limit} bytes)")]
    InputTooLarge { path: String, size: u64, limit: u64 },

    /// Remote sources are not fetched by this tool.
    #[error("Remote source {0} is not supported; download it first and pass a local path")]
    RemoteSource(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MarkballError {
    /// Stable machine-readable code used in result items
    pub fn code(&self) -> &'static str {
        match self {
            MarkballError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            MarkballError::FenceNotFound(_) => "FENCE_NOT_FOUND",
            MarkballError::BinaryInput(_) => "BINARY_INPUT",
            MarkballError::InvalidEncoding(_) => "INVALID_ENCODING",
            MarkballError::InputTooLarge { .. } => "INPUT_TOO_LARGE",
            MarkballError::RemoteSource(_) => "REMOTE_SOURCE",
            MarkballError::Io { .. } => "IO_ERROR",
        }
    }
}
