//! Parser configuration from `--config` and command-line overrides.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use tagschema::parser::MAX_DEPTH;
use tagschema::ParserConfig;

/// Load the config file if one is given, then apply `--max-depth`.
pub fn load_config(path: Option<&Path>, max_depth: Option<usize>) -> Result<ParserConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            if text.trim().is_empty() {
                ParserConfig::default()
            } else {
                serde_yaml::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
        }
        None => ParserConfig::default(),
    };
    if let Some(max_depth) = max_depth {
        ensure!(
            max_depth <= MAX_DEPTH,
            "--max-depth {max_depth} is above the ceiling of {MAX_DEPTH}"
        );
        config.max_depth = max_depth;
    }
    tracing::debug!(max_depth = config.max_depth, "parser config");
    Ok(config)
}
