use crate::output::print_json;
use anyhow::Context;
use conductor_core::{
    config::Config,
    reference::{RefToken, ReferenceResolver},
};
use std::path::Path;

pub fn run(root: &Path, reference: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let resolver = ReferenceResolver::new(config.docs_root(root));

    let token = RefToken::parse(reference)?;
    // Hard errors for the named reference; nested references degrade.
    let resolution = resolver.resolve(&token)?;
    let expanded = resolver.expand(&resolution.text);

    if json {
        print_json(&serde_json::json!({
            "reference": token.to_string(),
            "content": expanded.text,
            "resolved_at": resolution.resolved_at,
            "warnings": expanded.warnings,
        }))?;
        return Ok(());
    }

    for warning in &expanded.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", expanded.text);
    Ok(())
}
