//! # Parse Subcommand
//!
//! Builds one schema document and prints it as an indented tree or as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tagschema::ParserConfig;

use crate::load_schema;
use crate::tree;

/// Output format for `tagschema parse`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Tree,
    Json,
}

/// Arguments for the `tagschema parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Schema document to build.
    #[arg(value_name = "SCHEMA")]
    pub path: PathBuf,

    /// How to print the built schema.
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    pub format: Format,
}

/// Execute the parse subcommand.
///
/// Returns exit code: 0 when the document builds, 1 when it is rejected.
pub fn run_parse(args: &ParseArgs, config: &ParserConfig) -> Result<u8> {
    let Some(schema) = load_schema(&args.path, config)? else {
        return Ok(1);
    };
    tracing::info!(nodes = schema.count(), path = %args.path.display(), "built schema");

    println!("{}", render(&schema, args.format)?);
    Ok(0)
}

fn render(schema: &tagschema::SchemaNode, format: Format) -> Result<String> {
    match format {
        Format::Tree => Ok(tree::render(schema).trim_end().to_string()),
        Format::Json => serde_json::to_string_pretty(schema).context("failed to serialize schema"),
    }
}
