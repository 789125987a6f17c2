//! Fence stack tracking
//!
//! `begin` directives push an open fence, `end` directives pop the innermost
//! one. Closed fences keep the identifier given at `begin`.

use serde::{Deserialize, Serialize};

/// A fence that has been opened but not yet closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFence {
    pub identifier: String,
    pub line_begin: usize,
}

/// A closed fence. Line indices are 0-based and point at the directive lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fence {
    pub identifier: String,
    pub line_begin: usize,
    pub line_end: usize,
}

impl Fence {
    /// Index range of the content lines (both directive lines excluded)
    pub fn content_range(&self) -> std::ops::Range<usize> {
        self.line_begin + 1..self.line_end
    }
}

/// Outcome of closing the innermost fence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closed {
    pub fence: Fence,
    /// Whether the `end` payload named the fence it closed
    pub matched: bool,
}

/// LIFO stack of open fences
#[derive(Debug, Default)]
pub struct FenceStack {
    open: Vec<OpenFence>,
}

impl FenceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, identifier: impl Into<String>, line_begin: usize) {
        self.open.push(OpenFence {
            identifier: identifier.into(),
            line_begin,
        });
    }

    /// Close the innermost open fence at `line_end`.
    ///
    /// Returns `None` when nothing is open; no fence is fabricated in that case.
    pub fn pop_and_close(&mut self, end_payload: &str, line_end: usize) -> Option<Closed> {
        let open = self.open.pop()?;
        let matched = open.identifier == end_payload;

        Some(Closed {
            fence: Fence {
                identifier: open.identifier,
                line_begin: open.line_begin,
                line_end,
            },
            matched,
        })
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Remaining open fences, outermost first
    pub fn into_unclosed(self) -> Vec<OpenFence> {
        self.open
    }
}
