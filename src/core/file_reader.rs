//! Source loading
//!
//! Reads a Markball source (a local file or stdin) and splits it into lines
//! that keep their terminators, so fence content can be reproduced exactly.
//!
//! Handles:
//! - Non-UTF-8 content (lossy or strict)
//! - Oversized sources
//! - Binary sources
//! - Remote targets (rejected)

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::error::MarkballError;

/// Default maximum source size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Bytes inspected when looking for NUL bytes
const BINARY_SNIFF_LEN: usize = 8192;

/// Source name that selects stdin
pub const STDIN_SOURCE: &str = "-";

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Replace invalid bytes with U+FFFD and warn
    #[default]
    Lossy,
    /// Refuse sources that are not valid UTF-8
    Strict,
}

/// Configuration for source reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Maximum source size to process (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Lossy,
        }
    }
}

/// Warning codes for source reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// Lossy encoding conversion used
    LossyConversion,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::LossyConversion => "LOSSY_CONVERSION",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWarning {
    pub code: WarningCode,
    pub message: String,
}

impl FileWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A loaded source
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Display name: the path as given, or "-" for stdin
    pub name: String,

    /// Decoded text
    pub text: String,

    /// Warnings generated during reading
    pub warnings: Vec<FileWarning>,
}

impl SourceText {
    /// Lines with their terminators; concatenating them yields `text` again
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.text)
    }
}

/// Split text into lines, keeping "\n" / "\r\n" on each line
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Whether the target names a remote document
pub fn is_remote(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("http:/")
}

/// Load a source given by name ("-" for stdin)
pub fn load_source(source: &str, config: &FileReadConfig) -> Result<SourceText, MarkballError> {
    if is_remote(source) {
        return Err(MarkballError::RemoteSource(source.to_string()));
    }

    let bytes = if source == STDIN_SOURCE {
        read_stdin(config)?
    } else {
        read_file_bytes(Path::new(source), config)?
    };

    decode(source, bytes, config)
}

/// Decode raw bytes into a source, applying binary and encoding checks
pub fn decode(
    name: &str,
    bytes: Vec<u8>,
    config: &FileReadConfig,
) -> Result<SourceText, MarkballError> {
    let check_len = std::cmp::min(BINARY_SNIFF_LEN, bytes.len());
    if bytes[..check_len].contains(&0) {
        return Err(MarkballError::BinaryInput(name.to_string()));
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(SourceText {
            name: name.to_string(),
            text,
            warnings: Vec::new(),
        }),
        Err(err) => match config.encoding_strategy {
            EncodingStrategy::Strict => Err(MarkballError::InvalidEncoding(name.to_string())),
            EncodingStrategy::Lossy => {
                let text = String::from_utf8_lossy(err.as_bytes()).into_owned();
                log::warn!("{}: lossy UTF-8 conversion applied", name);
                Ok(SourceText {
                    name: name.to_string(),
                    text,
                    warnings: vec![FileWarning::new(
                        WarningCode::LossyConversion,
                        "Lossy UTF-8 conversion applied (some characters replaced)",
                    )],
                })
            }
        },
    }
}

/// Read file bytes, refusing files over the size limit
fn read_file_bytes(path: &Path, config: &FileReadConfig) -> Result<Vec<u8>, MarkballError> {
    let io_err = |source: std::io::Error| MarkballError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_err)?;
    if metadata.len() > config.max_file_size {
        return Err(MarkballError::InputTooLarge {
            path: path.display().to_string(),
            size: metadata.len(),
            limit: config.max_file_size,
        });
    }

    log::debug!("reading {} ({} bytes)", path.display(), metadata.len());
    fs::read(path).map_err(io_err)
}

fn read_stdin(config: &FileReadConfig) -> Result<Vec<u8>, MarkballError> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .lock()
        .take(config.max_file_size + 1)
        .read_to_end(&mut buffer)
        .map_err(|source| MarkballError::Io {
            path: PathBuf::from(STDIN_SOURCE),
            source,
        })?;

    if buffer.len() as u64 > config.max_file_size {
        return Err(MarkballError::InputTooLarge {
            path: STDIN_SOURCE.to_string(),
            size: buffer.len() as u64,
            limit: config.max_file_size,
        });
    }

    Ok(buffer)
}
