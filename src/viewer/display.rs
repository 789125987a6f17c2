//! Display commands - render, fence (view/raw/download), export

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::file_reader::FileReadConfig;
use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{make_relative, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{count_newlines, file_name_for};
use crate::parser::api::load_document;
use crate::parser::document::Document;
use crate::viewer::page::{raw_link, resolve, view_link, Page, DEFAULT_CSS, INDEX_PAGE};
use crate::viewer::{FenceMode, FenceSelector, ViewRequest};

/// What a fence request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceOutput {
    /// HTML page
    Page(String),
    /// Fence content, byte-exact
    Raw(String),
    /// Content to be saved as `file_name`
    Download {
        id: usize,
        identifier: String,
        file_name: String,
        content: String,
    },
}

/// Load a stylesheet; bare CSS is wrapped in a style element
pub fn load_css(css: Option<&Path>) -> Result<String> {
    let Some(path) = css else {
        return Ok(DEFAULT_CSS.to_string());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stylesheet: {:?}", path))?;

    if content.trim_start().starts_with('<') {
        Ok(content)
    } else {
        Ok(format!("<style type=\"text/css\">\n{}</style>", content))
    }
}

/// Answer a presentation request against a parsed document
pub fn display(request: &ViewRequest, document: &Document, css: &str) -> Result<FenceOutput> {
    let page = Page::new(&request.target, document, css);

    let Some(selector) = &request.fence else {
        return Ok(FenceOutput::Page(page.document_page()));
    };

    let id = resolve(document, selector).context("Fence not found")?;
    let fence = document.fence(id)?;

    Ok(match request.mode {
        FenceMode::View => FenceOutput::Page(page.fence_page(id)?),
        FenceMode::Raw => FenceOutput::Raw(document.get_fence_content_by_id(id)?),
        FenceMode::Download => FenceOutput::Download {
            id,
            identifier: fence.identifier.clone(),
            file_name: format!("{}.txt", file_name_for(&fence.identifier)),
            content: document.get_fence_content_by_id(id)?,
        },
    })
}

/// Run the render command
pub fn run_render(
    source: &str,
    read_config: &FileReadConfig,
    page: bool,
    css: Option<&Path>,
) -> Result<()> {
    let (text, document) = load_document(source, read_config)?;

    let html = if page {
        let css = load_css(css)?;
        Page::new(&text.name, &document, &css).document_page()
    } else {
        document.html().to_string()
    };

    write_stdout(html.as_bytes())
}

/// Run the fence command
pub fn run_fence(
    request: &ViewRequest,
    read_config: &FileReadConfig,
    out_dir: &Path,
    css: Option<&Path>,
    config: RenderConfig,
) -> Result<()> {
    let (_, document) = load_document(&request.target, read_config)?;
    let css = load_css(css)?;

    match display(request, &document, &css)? {
        FenceOutput::Page(html) => write_stdout(html.as_bytes()),
        FenceOutput::Raw(content) => write_stdout(content.as_bytes()),
        FenceOutput::Download {
            id,
            identifier,
            file_name,
            content,
        } => {
            fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;
            let path = out_dir.join(&file_name);
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write fence: {:?}", path))?;
            log::info!("saved fence {} to {}", id, path.display());

            let item = ResultItem::download(normalize_path(&path), id, identifier)
                .with_meta(Meta {
                    size: Some(content.len() as u64),
                    lines: Some(count_newlines(&content)),
                    ..Default::default()
                })
                .with_data(json!({ "file_name": file_name }));

            let mut result_set = ResultSet::new();
            result_set.push(item);
            Renderer::with_config(config).print(&result_set);
            Ok(())
        }
    }
}

/// Write a static site: index page, one view page and one raw file per fence
pub fn export(
    target: &str,
    document: &Document,
    out_dir: &Path,
    css: &str,
) -> Result<ResultSet> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    let page = Page::new(target, document, css);
    write_file(&out_dir.join(INDEX_PAGE), &page.document_page())?;

    let mut result_set = ResultSet::new();
    for (id, fence) in document.fences().iter().enumerate() {
        let content = document.get_fence_content_by_id(id)?;
        let raw_path = out_dir.join(raw_link(id));

        write_file(&out_dir.join(view_link(id)), &page.fence_page(id)?)?;
        write_file(&raw_path, &content)?;

        let shown = make_relative(&raw_path, out_dir).unwrap_or_else(|| raw_link(id));
        result_set.push(
            ResultItem::download(shown, id, fence.identifier.clone())
                .with_meta(Meta {
                    size: Some(content.len() as u64),
                    lines: Some(count_newlines(&content)),
                    ..Default::default()
                })
                .with_data(json!({ "view": view_link(id) })),
        );
    }

    log::info!(
        "exported {} fences to {}",
        document.fences().len(),
        out_dir.display()
    );
    Ok(result_set)
}

/// Run the export command
pub fn run_export(
    source: &str,
    read_config: &FileReadConfig,
    out_dir: &Path,
    css: Option<&Path>,
    config: RenderConfig,
) -> Result<()> {
    let (text, document) = load_document(source, read_config)?;
    let css = load_css(css)?;

    let result_set = export(&text.name, &document, out_dir, &css)?;
    Renderer::with_config(config).print(&result_set);

    Ok(())
}

/// Build a request from command-line selectors
pub fn fence_request(
    target: &str,
    id: Option<usize>,
    name: Option<String>,
    mode: FenceMode,
) -> ViewRequest {
    let selector = match (id, name) {
        (_, Some(name)) => FenceSelector::Name(name),
        (Some(id), None) => FenceSelector::Id(id),
        (None, None) => FenceSelector::Id(0),
    };
    ViewRequest::fence(target, selector, mode)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
