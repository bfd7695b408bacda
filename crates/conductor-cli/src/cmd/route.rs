use crate::output::print_json;
use anyhow::Context;
use conductor_core::{
    command::{self, CommandInvocation},
    config::Config,
    intent::IntentClassifier,
    orchestrator::{self, PlanContext, PlanRequest},
    reference::ReferenceResolver,
    registry::SpecialistRegistry,
    types::ToolKind,
};
use std::path::Path;
use std::str::FromStr;

pub fn run(
    root: &Path,
    text: &str,
    tool: Option<&str>,
    exec: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let registry =
        SpecialistRegistry::load(root, &config).context("failed to load specialists")?;
    let resolver = ReferenceResolver::new(config.docs_root(root));
    let tool_override = tool.map(ToolKind::from_str).transpose()?;

    let classifier = IntentClassifier::new(config.rule_set());
    let intent = classifier.classify(text);

    let plan = orchestrator::plan(
        &PlanRequest {
            text,
            intent,
            tool_override,
        },
        &PlanContext {
            registry: &registry,
            resolver: &resolver,
            config: &config,
        },
    )?;
    let invocation = command::synthesize(&plan);

    if json {
        print_json(&serde_json::json!({
            "plan": plan,
            "command": invocation,
        }))?;
    } else {
        println!("request:     {}", plan.request);
        println!(
            "category:    {} ({:.2} confidence)",
            plan.intent.category, plan.intent.confidence
        );
        println!("complexity:  {}", plan.intent.complexity);
        println!("specialists: {}", plan.specialists.join(", "));
        println!("tool:        {}", plan.tool);
        for warning in &plan.warnings {
            println!("warning:     {warning}");
        }
        println!("\n{}", invocation.shell_words());
    }

    if exec {
        return exec_invocation(root, &invocation);
    }
    Ok(())
}

/// Spawn the synthesized command with inherited stdio and propagate its
/// exit code. Only reached with `--exec`; the core never executes.
fn exec_invocation(root: &Path, invocation: &CommandInvocation) -> anyhow::Result<()> {
    let status = std::process::Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(root)
        .status()
        .with_context(|| format!("failed to spawn '{}'", invocation.program))?;
    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}
