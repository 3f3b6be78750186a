use anyhow::Result;

use readably::{classify_html, Config, ReadableBlock};

use crate::{ExclusionArgs, OutputFormat};

pub fn cmd_classify(input: &str, config: &Config, args: &ExclusionArgs, format: OutputFormat) -> Result<()> {
    let html = super::read_input(input)?;
    let classifier = super::classifier(config, args);
    let blocks = classify_html(&html, &classifier);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&blocks)?),
        OutputFormat::Text => print_blocks(&blocks),
    }

    Ok(())
}

fn print_blocks(blocks: &[ReadableBlock]) {
    if blocks.is_empty() {
        println!("No readable blocks found");
        return;
    }

    println!("📖 {} readable blocks\n", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        println!("{:>3}. {}", i + 1, block.path);
        println!("     {}", block.preview);
    }
}
