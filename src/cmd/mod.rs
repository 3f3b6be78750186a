pub mod classify;
pub mod exclusions;
pub mod probe;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use readably::{Classifier, Config, ExclusionList};

use crate::ExclusionArgs;

/// Load the config file, from `path` if given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            readably::load_config_from(path)?
        }
        None => readably::load_config()?,
    };
    Ok(config)
}

/// Effective exclusion list: config first, then command-line flags.
pub fn exclusion_list(config: &Config, args: &ExclusionArgs) -> ExclusionList {
    let mut list = if args.no_default_exclusions {
        ExclusionList::empty()
    } else {
        config.exclusions.build()
    };
    for tag in &args.exclude {
        list.insert(tag);
    }
    for tag in &args.include {
        list.remove(tag);
    }
    list
}

pub fn classifier(config: &Config, args: &ExclusionArgs) -> Classifier {
    Classifier::new(exclusion_list(config, args))
}

/// Read an HTML document from a file path, or stdin for `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("failed to read stdin")?;
        return Ok(html);
    }

    std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}
