//! # tagschema-cli — Command-Line Interface
//!
//! Provides the `tagschema` binary.
//!
//! ## Subcommands
//!
//! - `tagschema parse` — Build a schema document and print the tree or JSON.
//! - `tagschema check` — Check a YAML or JSON data file against a schema.
//! - `tagschema tags` — List the standard tag catalog.
//!
//! ```bash
//! tagschema parse schema.yaml --format json
//! tagschema check schema.yaml data.yaml
//! tagschema -vv --max-depth 32 parse schema.yaml
//! ```
//!
//! Every handler returns an exit code: 0 on success, 1 when the document or
//! data is rejected. Operational failures (unreadable files, bad config)
//! surface as errors and exit with 2.

pub mod check;
pub mod config;
pub mod parse;
pub mod tags;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};
use tagschema::{ParserConfig, SchemaNode, SchemaParser};

/// Read and build a schema file, printing the failure if it is rejected.
///
/// Returns `Ok(None)` when the document was read but did not build.
pub(crate) fn load_schema(path: &Path, config: &ParserConfig) -> Result<Option<SchemaNode>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let parser = SchemaParser::new().with_config(*config);
    match parser.parse(&text) {
        Ok(schema) => Ok(Some(schema)),
        Err(e) => {
            println!("FAIL: {}: {e}", path.display());
            Ok(None)
        }
    }
}
