//! markball - Parse Markball documents into HTML and extractable fences
//!
//! A Markball document is plain text with `#{tag} payload` directive lines.
//! `#{begin}`/`#{end}` pairs delimit nested fences whose content can be
//! extracted byte-exact.
//!
//! Modules:
//! - core: errors, source loading, result model and rendering
//! - parser: directive parsing, fence pairing, listing and linting
//! - viewer: HTML pages, single-fence display and static export
//! - cli: command-line interface

pub mod cli;
pub mod core;
pub mod parser;
pub mod viewer;

pub use crate::parser::document::{Diagnostic, Document};
pub use crate::parser::fence::Fence;
