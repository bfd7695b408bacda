use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use conductor_core::{
    config::{Config, ConfigWarning},
    registry::SpecialistRegistry,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut warnings = config.validate();

    // Registry problems (malformed definitions, unknown partners, missing
    // fallback) are configuration mistakes too; surface them in the same
    // report instead of failing opaquely.
    if let Err(e) = SpecialistRegistry::load(root, &config) {
        warnings.push(ConfigWarning::error(e.to_string()));
    }

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for warning in &warnings {
            println!("{warning}");
        }
    }

    if warnings.iter().any(|w| w.level.is_error()) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
