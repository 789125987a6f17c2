//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::file_reader::{EncodingStrategy, FileReadConfig, DEFAULT_MAX_FILE_SIZE};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::util::HashAlgorithm;
use crate::parser::api::DEFAULT_MAX_EXCERPT_BYTES;
use crate::viewer::FenceMode;

/// markball - parse, inspect and present Markball documents.
#[derive(Parser, Debug)]
#[command(name = "markball")]
#[command(
    author,
    version,
    about,
    long_about = r#"markball reads Markball documents: plain text annotated with #{tag} directives.

Directives:
    #{head} Title        heading
    #{cmd} make all      command
    #{begin} NAME        opens a fence
    #{end} NAME          closes the innermost open fence
    #{item} text         list item

SOURCE is a file path, or "-" to read from stdin.

Commands that list things print a ResultSet in the selected format (default: jsonl).
Commands that produce HTML or fence content write it to stdout as-is.

Examples:
    markball render notes.mb
    markball render notes.mb --page > notes.html
    markball fences notes.mb --format md
    markball fence notes.mb --name src/main.c --mode raw
    markball lint docs --strict
    markball export notes.mb --out site
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        env = "MARKBALL_FORMAT",
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Has no effect on commands that print HTML or fence content."
    )]
    pub format: String,

    /// Maximum source size in bytes.
    #[arg(
        long,
        global = true,
        env = "MARKBALL_MAX_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        value_name = "BYTES",
        long_help = "Refuse sources larger than this many bytes (default: 64 MiB)."
    )]
    pub max_size: u64,

    /// Refuse sources that are not valid UTF-8.
    #[arg(
        long,
        global = true,
        long_help = "Refuse sources that are not valid UTF-8.\n\n\
By default invalid bytes are replaced with U+FFFD and a warning is logged."
    )]
    pub strict_utf8: bool,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Reduce non-essential output. Only errors are logged and the lint summary\n\
is suppressed. Results are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr. RUST_LOG overrides the level."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a document to HTML.
    #[command(
        long_about = "Render SOURCE to HTML and print it to stdout.\n\n\
By default only the document body is printed. With --page it is wrapped in a\n\
complete page with a stylesheet, a header and a list of all fences.\n\n\
Examples:\n\
  markball render notes.mb\n\
  cat notes.mb | markball render - --page\n"
    )]
    Render {
        /// Markball source (file path or "-").
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Wrap the body in a full HTML page.
        #[arg(long)]
        page: bool,

        /// Stylesheet to use instead of the built-in one.
        #[arg(
            long,
            value_name = "FILE",
            long_help = "Stylesheet to use instead of the built-in one.\n\n\
A file starting with '<' is inserted as-is, anything else is wrapped in <style>."
        )]
        css: Option<PathBuf>,
    },

    /// List the fences of a document.
    #[command(
        long_about = "Emit one Fence result item per closed fence, in closing order.\n\n\
The item id is the fence index used by `markball fence --id`.\n\n\
Examples:\n\
  markball fences notes.mb\n\
  markball fences notes.mb --with-content --hash sha1\n"
    )]
    Fences {
        /// Markball source (file path or "-").
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Content hash algorithm.
        #[arg(long, default_value = "xxh3", value_parser = ["xxh3", "sha1"])]
        hash: String,

        /// Include fence content in the excerpt.
        #[arg(long)]
        with_content: bool,

        /// Maximum bytes of content per excerpt.
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_EXCERPT_BYTES,
            value_name = "BYTES",
            long_help = "Maximum bytes of content per excerpt (used with --with-content).\n\n\
Longer content is cut at a UTF-8 boundary and the item meta marks it as truncated."
        )]
        max_bytes: usize,
    },

    /// Show a single fence.
    #[command(
        group(ArgGroup::new("selector").args(["id", "name"])),
        long_about = "Show one fence of SOURCE, selected by index or identifier.\n\n\
Modes:\n\
- view: HTML page with the content and the fence list\n\
- raw: content bytes exactly as in the source\n\
- download: content saved to <identifier>.txt in --out\n\n\
Without a selector the first fence is shown.\n\n\
Examples:\n\
  markball fence notes.mb --id 2\n\
  markball fence notes.mb --name src/main.c --mode raw\n\
  markball fence notes.mb --name src/main.c --mode download --out build\n"
    )]
    Fence {
        /// Markball source (file path or "-").
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Fence index in closing order.
        #[arg(long, value_name = "N")]
        id: Option<usize>,

        /// Fence identifier.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Presentation mode (view/raw/download).
        #[arg(long, default_value = "view", value_parser = ["view", "raw", "download"])]
        mode: String,

        /// Output directory for download mode.
        #[arg(long, default_value = ".", value_name = "DIR")]
        out: PathBuf,

        /// Stylesheet to use instead of the built-in one.
        #[arg(long, value_name = "FILE")]
        css: Option<PathBuf>,
    },

    /// Check documents for pairing and content problems.
    #[command(
        long_about = "Lint one or more sources. Directories are walked (respecting ignore files)\n\
for *.markball, *.mb and *.txt files.\n\n\
Errors: FENCE_MISMATCH, UNBALANCED_CLOSE, UNCLOSED_FENCE, DUPLICATE_IDENTIFIER, LOAD_FAILED\n\
Warnings: EMPTY_FENCE, LARGE_FENCE, LOSSY_CONVERSION\n\n\
Examples:\n\
  markball lint notes.mb\n\
  markball lint docs --strict --format md\n"
    )]
    Lint {
        /// Sources or directories to lint.
        #[arg(value_name = "SOURCE", required = true)]
        sources: Vec<String>,

        /// Exit with an error when any error-level issue is found.
        #[arg(long)]
        strict: bool,
    },

    /// Write a static HTML site for a document.
    #[command(
        long_about = "Write index.html, fence-N.html and fence-N.txt for SOURCE into --out, then\n\
emit one Download result item per written fence.\n\n\
Example:\n\
  markball export notes.mb --out site\n"
    )]
    Export {
        /// Markball source (file path or "-").
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Output directory.
        #[arg(long, value_name = "DIR")]
        out: PathBuf,

        /// Stylesheet to use instead of the built-in one.
        #[arg(long, value_name = "FILE")]
        css: Option<PathBuf>,
    },
}

impl Cli {
    /// Log level implied by -q/-v
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }

    fn read_config(&self) -> FileReadConfig {
        FileReadConfig {
            max_file_size: self.max_size,
            encoding_strategy: if self.strict_utf8 {
                EncodingStrategy::Strict
            } else {
                EncodingStrategy::Lossy
            },
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_else(|e| {
        log::warn!("{}, falling back to jsonl", e);
        OutputFormat::default()
    });
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let read_config = cli.read_config();

    match cli.command {
        Commands::Render { source, page, css } => {
            crate::viewer::display::run_render(&source, &read_config, page, css.as_deref())
        }

        Commands::Fences {
            source,
            hash,
            with_content,
            max_bytes,
        } => {
            let hash: HashAlgorithm = hash.parse().unwrap_or_default();
            crate::parser::api::run_fences(
                &source,
                &read_config,
                hash,
                with_content.then_some(max_bytes),
                render_config,
            )
        }

        Commands::Fence {
            source,
            id,
            name,
            mode,
            out,
            css,
        } => {
            let mode: FenceMode = mode.parse().unwrap_or_default();
            let request = crate::viewer::display::fence_request(&source, id, name, mode);
            crate::viewer::display::run_fence(
                &request,
                &read_config,
                &out,
                css.as_deref(),
                render_config,
            )
        }

        Commands::Lint { sources, strict } => crate::parser::lint::run_lint(
            &sources,
            &read_config,
            strict,
            cli.quiet,
            render_config,
        ),

        Commands::Export { source, out, css } => crate::viewer::display::run_export(
            &source,
            &read_config,
            &out,
            css.as_deref(),
            render_config,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "markball",
            "fences",
            "a.mb",
            "--format",
            "md",
            "--strict-utf8",
            "--max-size",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.format, "md");
        let config = cli.read_config();
        assert_eq!(config.max_file_size, 10);
        assert_eq!(config.encoding_strategy, EncodingStrategy::Strict);
    }

    #[test]
    fn test_fence_selectors_conflict() {
        let result = Cli::try_parse_from(["markball", "fence", "a.mb", "--id", "1", "--name", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["markball", "-v", "render", "a.mb"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        let cli = Cli::try_parse_from(["markball", "-q", "render", "a.mb"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Error);
        assert!(Cli::try_parse_from(["markball", "-q", "-v", "render", "a.mb"]).is_err());
    }
}
