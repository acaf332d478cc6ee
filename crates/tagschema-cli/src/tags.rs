//! # Tags Subcommand
//!
//! Lists the tags the default registry resolves, one per line with the
//! leading `!` a document would use.

use anyhow::Result;
use clap::Args;
use tagschema::Registry;

/// Arguments for the `tagschema tags` subcommand.
#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Only list tags in this family (`field`, `validator`, `widget`).
    #[arg(long, value_name = "FAMILY")]
    pub family: Option<String>,
}

pub fn run_tags(args: &TagsArgs) -> Result<u8> {
    let tags = select(Registry::base(), args.family.as_deref());
    if tags.is_empty() {
        println!("no tags match");
        return Ok(1);
    }
    for tag in tags {
        println!("!{tag}");
    }
    Ok(0)
}

fn select(registry: &Registry, family: Option<&str>) -> Vec<String> {
    registry
        .tags()
        .into_iter()
        .filter(|tag| match family {
            Some(family) => tag
                .split_once('.')
                .is_some_and(|(head, _)| head == family),
            None => true,
        })
        .collect()
}
