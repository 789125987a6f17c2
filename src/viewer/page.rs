//! HTML pages around a parsed document
//!
//! The document HTML itself is inserted untouched; only the page chrome
//! (target name, fence identifiers) is escaped.

use html_escape::{encode_single_quoted_attribute, encode_text};

use crate::core::error::MarkballError;
use crate::core::util::{count_newlines, ellipsize_front};
use crate::parser::document::Document;
use crate::viewer::FenceSelector;

/// Stylesheet used when no custom one is given
pub const DEFAULT_CSS: &str = r#"<style type="text/css">
body { font-family: Arial,sans-serif; }
form { margin: 1em 0; }
pre {
	border-left: .5em solid gray;
	padding: .5em;
}
.cmd {
	background-color: #FFE0B2;
	border-left-color: #E65100;
}
.fence {
	border-left-color: #01579B;
	background-color: #B3E5FC;
}
</style>"#;

/// Identifiers longer than this are shown with a leading "..."
const MAX_IDENTIFIER_CHARS: usize = 60;

/// Page of the whole document
pub const INDEX_PAGE: &str = "index.html";

/// Link to the view page of fence `id`
pub fn view_link(id: usize) -> String {
    format!("fence-{}.html", id)
}

/// Link to the raw content of fence `id`
pub fn raw_link(id: usize) -> String {
    format!("fence-{}.txt", id)
}

/// File name a downloaded fence is saved under
pub fn download_name(identifier: &str) -> String {
    format!("{}.txt", identifier)
}

/// Resolve a selector to a fence id
pub fn resolve(document: &Document, selector: &FenceSelector) -> Result<usize, MarkballError> {
    match selector {
        FenceSelector::Id(id) => document.fence(*id).map(|_| *id),
        FenceSelector::Name(name) => document
            .fence_id_by_name(name)
            .ok_or_else(|| MarkballError::FenceNotFound(name.clone())),
    }
}

/// Builds pages for one document
pub struct Page<'a> {
    target: &'a str,
    document: &'a Document,
    css: &'a str,
}

impl<'a> Page<'a> {
    pub fn new(target: &'a str, document: &'a Document, css: &'a str) -> Self {
        Self {
            target,
            document,
            css,
        }
    }

    fn intro(&self, out: &mut String) {
        out.push_str("<html><meta charset=\"utf-8\">");
        out.push_str(self.css);
    }

    fn header(&self, out: &mut String) {
        self.intro(out);
        out.push_str(&format!(
            "<strong><a href='{}'>Markball2HTML</a></strong>",
            INDEX_PAGE
        ));
        out.push_str(&format!(
            ", rendering <a href='{}'>{}</a> ",
            encode_single_quoted_attribute(self.target),
            encode_text(self.target)
        ));

        let count = self.document.fences().len();
        if count > 0 {
            out.push_str(&format!("containing <a href='#fences'>{} files</a>", count));
        }
        out.push_str("<hr>");
    }

    /// Navigation list of all fences, in closing order
    pub fn fence_list(&self, out: &mut String) {
        let count = self.document.fences().len();
        out.push_str(&format!(
            "<hr><h3 id='fences'><a name='fences'>{} embedded files</a> in the <a href='{}'>current document</a></h3>",
            count, INDEX_PAGE
        ));
        out.push_str("<ul>");

        for (id, fence) in self.document.fences().iter().enumerate() {
            let short = ellipsize_front(&fence.identifier, MAX_IDENTIFIER_CHARS);
            out.push_str(&format!(
                "<li><a href='{}' class='ellipsis'>{}</a>",
                view_link(id),
                encode_text(&short)
            ));
            out.push_str(&format!(
                " [<a href='{}'>raw</a>, <a href='{}' download='{}'>download</a>]",
                raw_link(id),
                raw_link(id),
                encode_single_quoted_attribute(&download_name(&fence.identifier))
            ));
        }

        out.push_str("</ul>");
    }

    /// Whole document with header and fence list
    pub fn document_page(&self) -> String {
        let mut out = String::new();
        self.header(&mut out);
        out.push_str(self.document.html());
        self.fence_list(&mut out);
        out
    }

    /// Single fence with size information and the fence list
    pub fn fence_page(&self, id: usize) -> Result<String, MarkballError> {
        let fence = self.document.fence(id)?;
        let content = self.document.get_fence_content_by_id(id)?;
        let file_name = download_name(&fence.identifier);

        let mut out = String::new();
        self.header(&mut out);
        out.push_str(&format!(
            "<h2>File display: {}</h2>",
            encode_text(&file_name)
        ));
        out.push_str(&format!(
            "<p>Size: {} bytes, {} lines. ",
            content.len(),
            count_newlines(&content)
        ));
        out.push_str(&format!(
            "<a href='{}'>raw</a> <a href='{}' download='{}'>download</a> ",
            raw_link(id),
            raw_link(id),
            encode_single_quoted_attribute(&file_name)
        ));
        out.push_str("<pre class='fence'>");
        out.push_str(&content);
        out.push_str("</pre>");
        self.fence_list(&mut out);

        Ok(out)
    }
}
