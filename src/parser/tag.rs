//! Directive line matching
//!
//! A directive line looks like:
//! #{begin} path/to/file.txt
//!
//! Everything else is a plain line and is passed through untouched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Static regex for directive lines
/// Format: [anything]#{name} payload
pub static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*?#\{(?P<tag>[^}]+)\}\s*(?P<payload>.*?)\s*$")
        .expect("Invalid DIRECTIVE_RE regex")
});

/// Known directive names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Head,
    Cmd,
    Begin,
    End,
    Item,
    Other,
}

impl TagKind {
    /// Resolve a directive name, ignoring case
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "head" => TagKind::Head,
            "cmd" => TagKind::Cmd,
            "begin" => TagKind::Begin,
            "end" => TagKind::End,
            "item" => TagKind::Item,
            _ => TagKind::Other,
        }
    }
}

/// A parsed directive: the name as written and the trimmed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub payload: &'a str,
}

impl Tag<'_> {
    pub fn kind(&self) -> TagKind {
        TagKind::from_name(self.name)
    }
}

/// Classification of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    Tagged(Tag<'a>),
    Plain(&'a str),
}

/// Classify one line. Never fails: a line either is a directive or it is plain.
pub fn classify(line: &str) -> Classified<'_> {
    let Some(caps) = DIRECTIVE_RE.captures(line) else {
        return Classified::Plain(line);
    };

    match (caps.name("tag"), caps.name("payload")) {
        (Some(name), Some(payload)) => Classified::Tagged(Tag {
            name: name.as_str(),
            payload: payload.as_str(),
        }),
        _ => Classified::Plain(line),
    }
}
