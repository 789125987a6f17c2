//! Markball document parsing
//!
//! One forward pass over the lines renders HTML and collects fences:
//!
//! #{head} Title            -> <h1>Title</h1>
//! #{cmd} make              -> <pre class='cmd'>make</pre>
//! #{begin} a.txt           -> <pre class='fence' title='a.txt'>
//! #{end} a.txt             -> </pre><!-- fence a.txt -->
//! #{item} point            -> <p class='item'>point</p>
//! #{anything} text         -> <pre>text</pre>
//! other lines              -> copied verbatim
//!
//! Payloads and plain lines are inserted as-is. Nothing is escaped.

use serde::Serialize;

use crate::core::error::MarkballError;
use crate::parser::fence::{Closed, Fence, FenceStack, OpenFence};
use crate::parser::tag::{classify, Classified, Tag, TagKind};

/// Problems found while parsing. None of them stop the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `end` payload differs from the identifier of the fence it closed
    FenceMismatch {
        line: usize,
        expected: String,
        found: String,
    },
    /// `end` with no open fence
    UnbalancedClose { line: usize, found: String },
    /// `begin` never closed before end of input
    UnclosedFence { line: usize, identifier: String },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::FenceMismatch { .. } => "FENCE_MISMATCH",
            Diagnostic::UnbalancedClose { .. } => "UNBALANCED_CLOSE",
            Diagnostic::UnclosedFence { .. } => "UNCLOSED_FENCE",
        }
    }

    /// 0-indexed line the diagnostic refers to
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::FenceMismatch { line, .. }
            | Diagnostic::UnbalancedClose { line, .. }
            | Diagnostic::UnclosedFence { line, .. } => *line,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Diagnostic::FenceMismatch {
                expected, found, ..
            } => format!("Fence '{}' ends but '{}' was expected to end", found, expected),
            Diagnostic::UnbalancedClose { found, .. } => {
                format!("Fence '{}' ends but no fence is open", found)
            }
            Diagnostic::UnclosedFence { identifier, .. } => {
                format!("Fence '{}' is never closed", identifier)
            }
        }
    }
}

/// Mutable state threaded through the single parsing pass
#[derive(Debug, Default)]
struct ParserState {
    html: String,
    stack: FenceStack,
    fences: Vec<Fence>,
    diagnostics: Vec<Diagnostic>,
}

impl ParserState {
    fn feed(&mut self, index: usize, line: &str) {
        match classify(line) {
            Classified::Plain(text) => self.html.push_str(text),
            Classified::Tagged(tag) => self.dispatch(index, tag),
        }
    }

    fn dispatch(&mut self, index: usize, tag: Tag<'_>) {
        let payload = tag.payload;
        match tag.kind() {
            TagKind::Head => self.wrap("<h1>", payload, "</h1>"),
            TagKind::Cmd => self.wrap("<pre class='cmd'>", payload, "</pre>"),
            TagKind::Begin => {
                self.html.push_str("<pre class='fence' title='");
                self.html.push_str(payload);
                self.html.push_str("'>");
                self.stack.push(payload, index);
                log::trace!(
                    "line {}: open fence '{}' (depth {})",
                    index,
                    payload,
                    self.stack.depth()
                );
            }
            TagKind::End => self.close(index, payload),
            TagKind::Item => self.wrap("<p class='item'>", payload, "</p>"),
            TagKind::Other => self.wrap("<pre>", payload, "</pre>"),
        }
    }

    fn close(&mut self, index: usize, payload: &str) {
        match self.stack.pop_and_close(payload, index) {
            Some(Closed { fence, matched }) => {
                if !matched {
                    log::debug!(
                        "line {}: fence '{}' closed by '{}'",
                        index,
                        fence.identifier,
                        payload
                    );
                    self.html.push_str(&format!(
                        "Debugging Error: Fence '{}' ends but I expected '{}' to end",
                        payload, fence.identifier
                    ));
                    self.diagnostics.push(Diagnostic::FenceMismatch {
                        line: index,
                        expected: fence.identifier.clone(),
                        found: payload.to_string(),
                    });
                }
                self.fences.push(fence);
            }
            None => {
                log::warn!("line {}: fence '{}' ends but no fence is open", index, payload);
                self.html.push_str(&format!(
                    "Debugging Error: Fence '{}' ends but no fence is open",
                    payload
                ));
                self.diagnostics.push(Diagnostic::UnbalancedClose {
                    line: index,
                    found: payload.to_string(),
                });
            }
        }

        self.html.push_str("</pre><!-- fence ");
        self.html.push_str(payload);
        self.html.push_str(" -->");
    }

    fn wrap(&mut self, open: &str, payload: &str, close: &str) {
        self.html.push_str(open);
        self.html.push_str(payload);
        self.html.push_str(close);
    }
}

/// A parsed Markball document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    html: String,
    fences: Vec<Fence>,
    unclosed: Vec<OpenFence>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Parse a complete sequence of lines. Lines should keep their terminators
    /// for content extraction to reproduce the source exactly.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let mut state = ParserState::default();

        for (index, line) in lines.iter().enumerate() {
            state.feed(index, line);
        }

        let ParserState {
            html,
            stack,
            fences,
            mut diagnostics,
        } = state;

        let unclosed = stack.into_unclosed();
        for open in &unclosed {
            log::warn!(
                "line {}: fence '{}' is never closed",
                open.line_begin,
                open.identifier
            );
            diagnostics.push(Diagnostic::UnclosedFence {
                line: open.line_begin,
                identifier: open.identifier.clone(),
            });
        }

        Self {
            lines,
            html,
            fences,
            unclosed,
            diagnostics,
        }
    }

    /// Parse a whole text, splitting it into lines that keep their terminators
    pub fn parse_str(text: &str) -> Self {
        Self::parse(text.split_inclusive('\n'))
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Closed fences in closing order
    pub fn fences(&self) -> &[Fence] {
        &self.fences
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Fences opened but never closed; they are not part of `fences()`
    pub fn unclosed_fences(&self) -> &[OpenFence] {
        &self.unclosed
    }

    pub fn fence(&self, id: usize) -> Result<&Fence, MarkballError> {
        self.fences.get(id).ok_or(MarkballError::IndexOutOfRange {
            index: id,
            len: self.fences.len(),
        })
    }

    /// Id of the first fence (in closing order) with this identifier
    pub fn fence_id_by_name(&self, identifier: &str) -> Option<usize> {
        self.fences.iter().position(|f| f.identifier == identifier)
    }

    /// Original text between the `begin` and `end` lines of fence `id`
    pub fn get_fence_content_by_id(&self, id: usize) -> Result<String, MarkballError> {
        let fence = self.fence(id)?;
        Ok(self.content_of(fence))
    }

    /// Content of the first fence (in closing order) named `identifier`
    pub fn get_fence_content_by_name(&self, identifier: &str) -> Option<String> {
        self.fences
            .iter()
            .find(|f| f.identifier == identifier)
            .map(|f| self.content_of(f))
    }

    fn content_of(&self, fence: &Fence) -> String {
        self.lines[fence.content_range()].concat()
    }
}
