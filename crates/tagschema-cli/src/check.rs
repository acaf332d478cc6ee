//! # Check Subcommand
//!
//! Builds a schema document, then checks a YAML or JSON data file against it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value as Json;
use tagschema::ParserConfig;

use crate::load_schema;

/// Arguments for the `tagschema check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document to build.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Data file to check. YAML or JSON.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the data conforms, 1 when the schema is rejected
/// or the data has violations.
pub fn run_check(args: &CheckArgs, config: &ParserConfig) -> Result<u8> {
    let Some(schema) = load_schema(&args.schema, config)? else {
        return Ok(1);
    };
    let data = load_data(&args.data)?;

    match schema.validate(&data) {
        Ok(()) => {
            println!("OK: {}", args.data.display());
            Ok(0)
        }
        Err(violations) => {
            tracing::info!(count = violations.len(), "data rejected");
            println!("FAIL: {}", args.data.display());
            for violation in violations.violations() {
                println!("  {violation}");
            }
            Ok(1)
        }
    }
}

/// JSON is a subset of YAML, so one loader serves both.
fn load_data(path: &Path) -> Result<Json> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("invalid data {}", path.display()))
}
