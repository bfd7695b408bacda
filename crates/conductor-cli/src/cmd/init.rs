use anyhow::Context;
use conductor_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing conductor in: {}", root.display());

    // 1. Create .conductor directory structure
    for dir in [
        paths::CONDUCTOR_DIR,
        paths::SPECIALISTS_DIR,
        paths::PATTERNS_DIR,
    ] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    // 2. Write config.yaml if missing
    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let config = Config::new(&project_name);
        config.save(root).context("failed to write config.yaml")?;
        println!("  created: .conductor/config.yaml");
    } else {
        println!("  exists:  .conductor/config.yaml");
    }

    // 3. Starter specialist pack, written only where missing
    let specialists_dir = root.join(paths::SPECIALISTS_DIR);
    for (filename, content) in STARTER_SPECIALISTS {
        let path = specialists_dir.join(filename);
        let created = io::write_if_missing(&path, content.as_bytes())?;
        if created {
            println!("  created: .conductor/specialists/{filename}");
        } else {
            println!("  exists:  .conductor/specialists/{filename}");
        }
    }

    // 4. Sample pattern doc that the starter briefings reference
    let pattern_path = root.join(paths::PATTERNS_DIR).join("general.md");
    if io::write_if_missing(&pattern_path, GENERAL_PATTERNS.as_bytes())? {
        println!("  created: .conductor/patterns/general.md");
    } else {
        println!("  exists:  .conductor/patterns/general.md");
    }

    println!("\nConductor initialized.");
    println!("Next: conductor route \"describe a task\"");

    Ok(())
}

// ---------------------------------------------------------------------------
// Starter content
// ---------------------------------------------------------------------------

/// Starter specialists, grouped by category subdirectory. The loader walks
/// recursively in lexicographic path order, so entries here are listed the
/// same way.
const STARTER_SPECIALISTS: &[(&str, &str)] = &[
    (
        "cognitive/research-analyst.yaml",
        r#"id: research-analyst
title: Research Analyst
tags: [research]
briefing: |
  Compare at least two options with concrete trade-offs before
  recommending one.
"#,
    ),
    (
        "cognitive/system-architect.yaml",
        r#"id: system-architect
title: System Architect
tags: [analysis, architecture]
tools: [single_agent, swarm]
briefing: |
  Trace the failure or requirement to its root cause before proposing
  structure. Name the trade-offs.
"#,
    ),
    (
        "domain/code-reviewer.yaml",
        r#"id: code-reviewer
title: Code Reviewer
tags: [review]
briefing: |
  Review for correctness first, style second. Flag missing tests and
  unclear naming; suggest, do not rewrite.
"#,
    ),
    (
        "domain/performance-analyst.yaml",
        r#"id: performance-analyst
title: Performance Analyst
tags: [performance]
briefing: |
  Measure before changing anything. Name the metric, the baseline, and
  the target.
"#,
    ),
    (
        "domain/security-auditor.yaml",
        r#"id: security-auditor
title: Security Auditor
tags: [security, review]
briefing: |
  Assume hostile input everywhere. Check authentication, authorization,
  and secrets handling on every touched path.
"#,
    ),
    (
        "orchestration/generalist.yaml",
        r#"id: generalist
title: Generalist
tags: [general, coding]
briefing: |
  Follow @patterns/general.md#working-agreements.
"#,
    ),
    (
        "technical/backend-engineer.yaml",
        r#"id: backend-engineer
title: Backend Engineer
tags: [backend, api]
tools: [single_agent, swarm]
partners: [devops-engineer]
briefing: |
  Own the service side: endpoints, data models, migrations. Keep handlers
  thin and push logic into testable modules.
"#,
    ),
    (
        "technical/devops-engineer.yaml",
        r#"id: devops-engineer
title: DevOps Engineer
tags: [devops, infrastructure]
tools: [single_agent, swarm]
partners: [backend-engineer]
briefing: |
  Prefer boring, reproducible infrastructure. Every deploy step must be
  scripted and reversible.
"#,
    ),
    (
        "technical/frontend-engineer.yaml",
        r#"id: frontend-engineer
title: Frontend Engineer
tags: [frontend, ui]
tools: [single_agent, swarm]
partners: [backend-engineer]
briefing: |
  Apply @patterns/general.md#component-structure. Keep state close to
  where it is used.
"#,
    ),
    (
        "technical/qa-engineer.yaml",
        r#"id: qa-engineer
title: QA Engineer
tags: [testing]
briefing: |
  Test the behavior users see, at the boundaries. Every bug fix gets a
  regression test.
"#,
    ),
];

const GENERAL_PATTERNS: &str = r#"# General Patterns

Shared working patterns referenced from specialist briefings.

## Working Agreements

- Keep changes small and reviewable.
- State assumptions explicitly in the task description.
- Prefer the simplest design that satisfies the request.

## Component Structure

- One component per file, named after the file.
- Type the props at the boundary.
- Hoist shared state to the nearest common ancestor.
"#;
