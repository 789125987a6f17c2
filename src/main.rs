//! markball - A parser and viewer for Markball documents
//!
//! markball provides:
//! - A line-oriented parser for #{tag} directives and nested fences
//! - HTML rendering of documents and single fences
//! - Fence extraction, linting and static export
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;
use markball::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG, when set, wins over -q/-v
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    cli::run(cli)
}
