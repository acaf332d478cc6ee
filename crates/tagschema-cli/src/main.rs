//! # tagschema CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagschema_cli::check::{run_check, CheckArgs};
use tagschema_cli::config::load_config;
use tagschema_cli::parse::{run_parse, ParseArgs};
use tagschema_cli::tags::{run_tags, TagsArgs};

/// Build schema trees from tagged YAML documents.
#[derive(Parser, Debug)]
#[command(name = "tagschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML parser configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum document nesting depth. Overrides the config file.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a schema document and print it.
    Parse(ParseArgs),

    /// Check a data file against a schema document.
    Check(CheckArgs),

    /// List the tags understood by the default registry.
    Tags(TagsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = load_config(cli.config.as_deref(), cli.max_depth).and_then(|config| {
        match &cli.command {
            Commands::Parse(args) => run_parse(args, &config),
            Commands::Check(args) => run_check(args, &config),
            Commands::Tags(args) => run_tags(args),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
