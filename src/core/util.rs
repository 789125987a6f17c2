//! Common utilities

use sha1::{Digest, Sha1};
use xxhash_rust::xxh3::xxh3_64;

/// Hash algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Xxh3,
    Sha1,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xxh3" => Ok(HashAlgorithm::Xxh3),
            "sha1" => Ok(HashAlgorithm::Sha1),
            _ => Err(format!("Unknown hash algorithm: {}", s)),
        }
    }
}

/// Compute hash of bytes
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Xxh3 => format!("{:016x}", xxh3_64(data)),
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            hasher.update(data);
            format!("{:x}", hasher.finalize())
        }
    }
}

/// Truncate string to max bytes, returning (truncated_string, was_truncated)
pub fn truncate_string(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    // Find a valid UTF-8 boundary
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (s[..end].to_string(), true)
}

/// Keep the last `max_chars` characters, prefixed with "..." when shortened
pub fn ellipsize_front(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        return s.to_string();
    }

    let tail: String = s.chars().skip(count - max_chars).collect();
    format!("...{}", tail)
}

/// Number of '\n' characters in the text
pub fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

/// Turn a fence identifier into a single file name
pub fn file_name_for(identifier: &str) -> String {
    let name: String = identifier
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();

    let name = name.trim_matches('.');
    if name.is_empty() {
        "fence".to_string()
    } else {
        name.to_string()
    }
}
