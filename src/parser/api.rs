//! Markball API - load, list fences

use anyhow::{Context, Result};

use crate::core::file_reader::{load_source, FileReadConfig, SourceText};
use crate::core::model::{Meta, RangeLine, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{count_newlines, hash_bytes, truncate_string, HashAlgorithm};
use crate::parser::document::Document;

/// Load a source and parse it
pub fn load_document(source: &str, config: &FileReadConfig) -> Result<(SourceText, Document)> {
    let text = load_source(source, config)
        .with_context(|| format!("Failed to load Markball source {}", source))?;
    let document = Document::parse(text.lines());

    log::debug!(
        "{}: {} lines, {} fences, {} diagnostics",
        text.name,
        document.lines().len(),
        document.fences().len(),
        document.diagnostics().len()
    );

    Ok((text, document))
}

/// Default excerpt limit for `fences --with-content`
pub const DEFAULT_MAX_EXCERPT_BYTES: usize = 65536;

/// Describe every fence of a document as a result item, in closing order.
/// With `max_bytes`, the content is attached as a (possibly truncated) excerpt.
pub fn list_fences(
    document: &Document,
    path: &str,
    hash: HashAlgorithm,
    max_bytes: Option<usize>,
) -> ResultSet {
    let mut result_set = ResultSet::new();

    for (id, fence) in document.fences().iter().enumerate() {
        let content = match document.get_fence_content_by_id(id) {
            Ok(content) => content,
            Err(_) => continue,
        };

        let mut item = ResultItem::fence(
            path,
            id,
            fence.identifier.clone(),
            RangeLine::new(fence.line_begin, fence.line_end),
        )
        .with_meta(Meta {
            size: Some(content.len() as u64),
            lines: Some(count_newlines(&content)),
            hash: Some(hash_bytes(content.as_bytes(), hash)),
            truncated: false,
        });

        if let Some(max_bytes) = max_bytes {
            let (excerpt, truncated) = truncate_string(&content, max_bytes);
            item.excerpt = Some(excerpt);
            item.meta.truncated = truncated;
        }

        result_set.push(item);
    }

    result_set
}

/// Run the fences command
pub fn run_fences(
    source: &str,
    read_config: &FileReadConfig,
    hash: HashAlgorithm,
    max_bytes: Option<usize>,
    config: RenderConfig,
) -> Result<()> {
    let (text, document) = load_document(source, read_config)?;
    let result_set = list_fences(&document, &text.name, hash, max_bytes);

    Renderer::with_config(config).print(&result_set);

    Ok(())
}
