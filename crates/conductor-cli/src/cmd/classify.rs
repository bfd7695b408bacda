use crate::output::print_json;
use anyhow::Context;
use conductor_core::{config::Config, intent::IntentClassifier};
use std::path::Path;

pub fn run(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let classifier = IntentClassifier::new(config.rule_set());
    let intent = classifier.classify(text);

    if json {
        print_json(&intent)?;
        return Ok(());
    }

    println!("category:   {}", intent.category);
    println!("complexity: {}", intent.complexity);
    println!("confidence: {:.2}", intent.confidence);
    println!("domains:    {}", join_or_none(&intent.domains));
    println!("matched:    {}", join_or_none(&intent.matched));
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
