use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use conductor_core::{config::Config, registry::SpecialistRegistry};
use std::path::Path;

#[derive(Subcommand)]
pub enum SpecialistSubcommand {
    /// List all specialists
    List,

    /// Show one specialist definition
    Show {
        /// Specialist id
        id: String,
    },
}

pub fn run(root: &Path, subcmd: SpecialistSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let registry =
        SpecialistRegistry::load(root, &config).context("failed to load specialists")?;

    match subcmd {
        SpecialistSubcommand::List => list(&registry, json),
        SpecialistSubcommand::Show { id } => show(&registry, &id, json),
    }
}

fn list(registry: &SpecialistRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&registry.all());
    }

    let rows: Vec<Vec<String>> = registry
        .all()
        .iter()
        .map(|def| {
            vec![
                def.id.clone(),
                def.tags.join(", "),
                def.tools
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                def.partners.join(", "),
            ]
        })
        .collect();
    print_table(&["ID", "TAGS", "TOOLS", "PARTNERS"], &rows);
    Ok(())
}

fn show(registry: &SpecialistRegistry, id: &str, json: bool) -> anyhow::Result<()> {
    let def = registry.get(id)?;
    if json {
        print_json(def)
    } else {
        print!("{}", serde_yaml::to_string(def)?);
        Ok(())
    }
}
