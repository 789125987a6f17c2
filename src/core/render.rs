//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet, Severity};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render and print to stdout, skipping empty output
    pub fn print(&self, result_set: &ResultSet) {
        let output = self.render(result_set);
        if !output.is_empty() {
            println!("{}", output);
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut fences = Vec::new();
        let mut downloads = Vec::new();
        let mut issues = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Fence => fences.push(item),
                Kind::Download => downloads.push(item),
                Kind::Issue => issues.push(item),
            }
        }

        if !issues.is_empty() {
            output.push_str("## Issues\n\n");
            for item in issues {
                let marker = match item.severity {
                    Some(Severity::Error) => "error",
                    _ => "warning",
                };
                let location = match (&item.path, item.range) {
                    (Some(path), Some(r)) => format!("`{}` line {}", path, r.start),
                    (Some(path), None) => format!("`{}`", path),
                    _ => String::new(),
                };
                for error in &item.errors {
                    output.push_str(&format!(
                        "- {} **{}** {}: {}\n",
                        marker, error.code, location, error.message
                    ));
                }
            }
            output.push('\n');
        }

        if !fences.is_empty() {
            output.push_str("## Fences\n\n");
            for item in fences {
                self.render_item_md(&mut output, item);
            }
        }

        if !downloads.is_empty() {
            output.push_str("## Downloads\n\n");
            for item in downloads {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`", path));
                    if let Some(size) = item.meta.size {
                        output.push_str(&format!(" ({} bytes)", size));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        output.push_str("### ");
        if let Some(id) = item.id {
            output.push_str(&format!("[{}] ", id));
        }
        if let Some(identifier) = &item.identifier {
            output.push_str(&format!("`{}`", identifier));
        }
        if let Some(r) = &item.range {
            output.push_str(&format!(" (lines {}-{})", r.start, r.end));
        }
        output.push('\n');

        if let Some(size) = item.meta.size {
            output.push_str(&format!("\n{} bytes", size));
            if let Some(hash) = &item.meta.hash {
                output.push_str(&format!(", hash `{}`", hash));
            }
            output.push('\n');
        }

        if let Some(excerpt) = &item.excerpt {
            output.push_str("\n```\n");
            output.push_str(excerpt);
            if !excerpt.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n");
        }

        if item.meta.truncated {
            output.push_str("\n> Content was truncated\n");
        }

        output.push('\n');
    }

    /// Render as raw output: excerpts only
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}
