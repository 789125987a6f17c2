//! Markball linting module
//!
//! Checks for:
//! - begin/end pairing (mismatched, unbalanced and unclosed fences)
//! - Duplicate identifiers within a document
//! - Empty/oversized fences

use anyhow::{bail, Result};
use colored::Colorize;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::file_reader::FileReadConfig;
use crate::core::model::{ItemError, RangeLine, ResultItem, ResultSet, Severity};
use crate::core::paths::normalize_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::parser::api::load_document;
use crate::parser::document::{Diagnostic, Document};

/// A lint issue
#[derive(Debug, Clone)]
pub struct LintIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub path: String,
    pub line: Option<usize>,
}

impl LintIssue {
    pub fn error(code: &str, message: &str, path: &str, line: Option<usize>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            message: message.to_string(),
            path: path.to_string(),
            line,
        }
    }

    pub fn warning(code: &str, message: &str, path: &str, line: Option<usize>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            message: message.to_string(),
            path: path.to_string(),
            line,
        }
    }

    pub fn from_diagnostic(diagnostic: &Diagnostic, path: &str) -> Self {
        Self::error(
            diagnostic.code(),
            &diagnostic.message(),
            path,
            Some(diagnostic.line()),
        )
    }

    pub fn to_result_item(&self) -> ResultItem {
        let item = ResultItem::issue(
            self.path.clone(),
            self.severity,
            ItemError::new(&self.code, &self.message),
        );
        match self.line {
            Some(line) => item.with_range(RangeLine::new(line, line)),
            None => item,
        }
    }
}

/// Maximum recommended fence size (in content lines)
const MAX_FENCE_LINES: usize = 500;

/// File extensions picked up when linting a directory
const MARKBALL_EXTENSIONS: [&str; 3] = ["markball", "mb", "txt"];

/// Lint a parsed document
pub fn lint_document(document: &Document, path: &str) -> Vec<LintIssue> {
    let mut issues: Vec<LintIssue> = document
        .diagnostics()
        .iter()
        .map(|d| LintIssue::from_diagnostic(d, path))
        .collect();

    let mut by_identifier: HashMap<&str, Vec<usize>> = HashMap::new();

    for fence in document.fences() {
        let content_lines = fence.content_range().len();

        if content_lines == 0 {
            issues.push(LintIssue::warning(
                "EMPTY_FENCE",
                &format!("Fence '{}' has empty content", fence.identifier),
                path,
                Some(fence.line_begin),
            ));
        } else if content_lines > MAX_FENCE_LINES {
            issues.push(LintIssue::warning(
                "LARGE_FENCE",
                &format!(
                    "Fence '{}' is very large ({} lines), consider splitting",
                    fence.identifier, content_lines
                ),
                path,
                Some(fence.line_begin),
            ));
        }

        by_identifier
            .entry(fence.identifier.as_str())
            .or_default()
            .push(fence.line_begin);
    }

    for (identifier, lines) in &by_identifier {
        if lines.len() > 1 {
            for line in lines {
                issues.push(LintIssue::error(
                    "DUPLICATE_IDENTIFIER",
                    &format!(
                        "Fence identifier '{}' is used {} times",
                        identifier,
                        lines.len()
                    ),
                    path,
                    Some(*line),
                ));
            }
        }
    }

    issues.sort_by_key(|i| i.line);
    issues
}

/// Expand the given sources: files are kept, directories are walked
pub fn collect_sources(sources: &[String]) -> Vec<String> {
    let mut collected = Vec::new();

    for source in sources {
        let path = Path::new(source);
        if !path.is_dir() {
            collected.push(source.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkBuilder::new(path)
            .build()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|p| p.is_file() && is_markball_file(p))
            .collect();
        found.sort();

        log::debug!("{}: {} Markball files", source, found.len());
        collected.extend(found.iter().map(|p| normalize_path(p)));
    }

    collected
}

fn is_markball_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MARKBALL_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lint every source; sources that fail to load become error issues
pub fn lint_sources(sources: &[String], read_config: &FileReadConfig) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for source in collect_sources(sources) {
        match load_document(&source, read_config) {
            Ok((text, document)) => {
                for warning in &text.warnings {
                    issues.push(LintIssue::warning(
                        warning.code.as_str(),
                        &warning.message,
                        &source,
                        None,
                    ));
                }
                issues.extend(lint_document(&document, &source));
            }
            Err(err) => {
                log::warn!("{:#}", err);
                issues.push(LintIssue::error("LOAD_FAILED", &format!("{:#}", err), &source, None));
            }
        }
    }

    issues
}

/// Run the lint command
pub fn run_lint(
    sources: &[String],
    read_config: &FileReadConfig,
    strict: bool,
    quiet: bool,
    config: RenderConfig,
) -> Result<()> {
    let issues = lint_sources(sources, read_config);

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    let mut result_set: ResultSet = issues.iter().map(LintIssue::to_result_item).collect();
    result_set.sort();
    Renderer::with_config(config).print(&result_set);

    if !quiet {
        eprintln!(
            "{} {}, {} {}",
            errors.to_string().red().bold(),
            if errors == 1 { "error" } else { "errors" },
            warnings.to_string().yellow().bold(),
            if warnings == 1 { "warning" } else { "warnings" },
        );
    }

    if strict && errors > 0 {
        bail!("lint found {} error(s)", errors);
    }

    Ok(())
}
