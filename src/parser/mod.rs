//! Parser module - Parse annotated text into HTML and extractable fences
//!
//! Directives are lines of the form `#{name} payload`. Fences are delimited by
//! `#{begin} identifier` ... `#{end} identifier` and may nest.

pub mod api;
pub mod document;
pub mod fence;
pub mod lint;
pub mod tag;
