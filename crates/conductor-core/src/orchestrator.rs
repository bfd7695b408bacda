//! Request routing: intent in, orchestration plan out.
//!
//! Planning is deterministic. Given the same request, registry, config,
//! and documents on disk, `plan` produces the same selection, tool, and
//! briefing every time (only the plan id and timestamp differ). Nothing
//! here executes commands; the plan is handed to the synthesizer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{Config, ToolCommand};
use crate::error::{ConductorError, Result};
use crate::intent::Intent;
use crate::reference::ReferenceResolver;
use crate::registry::SpecialistRegistry;
use crate::types::{Complexity, TaskCategory, ToolKind};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

pub struct PlanContext<'a> {
    pub registry: &'a SpecialistRegistry,
    pub resolver: &'a ReferenceResolver,
    pub config: &'a Config,
}

pub struct PlanRequest<'a> {
    pub text: &'a str,
    pub intent: Intent,
    pub tool_override: Option<ToolKind>,
}

// ---------------------------------------------------------------------------
// OrchestrationPlan
// ---------------------------------------------------------------------------

/// A fully resolved routing decision, consumed by the command synthesizer.
/// Not persisted; the id and timestamp exist for logs and downstream
/// correlation.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationPlan {
    pub id: Uuid,
    pub request: String,
    pub intent: Intent,
    /// Selected specialist ids, selection order, never empty.
    pub specialists: Vec<String>,
    pub tool: ToolKind,
    pub tool_command: ToolCommand,
    /// Flag name to value; BTreeMap keeps synthesized argument order stable.
    pub args: BTreeMap<String, String>,
    pub briefing: String,
    /// Degraded reference resolutions, if any.
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tag derivation
// ---------------------------------------------------------------------------

/// Capability tag implied by a category. `Other` implies none; the fallback
/// specialist covers it.
pub fn category_tag(category: TaskCategory) -> Option<&'static str> {
    match category {
        TaskCategory::Build => Some("coding"),
        TaskCategory::Review => Some("review"),
        TaskCategory::Debug => Some("analysis"),
        TaskCategory::Test => Some("testing"),
        TaskCategory::Deploy => Some("devops"),
        TaskCategory::Research => Some("research"),
        TaskCategory::Other => None,
    }
}

/// Category tag plus the intent's domain tags, order-preserving dedup.
pub fn required_tags(intent: &Intent) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(1 + intent.domains.len());
    if let Some(tag) = category_tag(intent.category) {
        tags.push(tag.to_string());
    }
    for domain in &intent.domains {
        if !tags.contains(domain) {
            tags.push(domain.clone());
        }
    }
    tags
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

pub fn plan(req: &PlanRequest, ctx: &PlanContext) -> Result<OrchestrationPlan> {
    let tags = required_tags(&req.intent);

    // Top-ranked specialist per required tag, dedup by id.
    let mut specialists: Vec<String> = Vec::new();
    for tag in &tags {
        if let Some(def) = ctx.registry.best_for(tag) {
            if !specialists.contains(&def.id) {
                specialists.push(def.id.clone());
            }
        }
    }

    // The plan is never empty: fall back, or fail this request.
    if specialists.is_empty() {
        let fallback = ctx
            .registry
            .fallback()
            .ok_or_else(|| ConductorError::NoSpecialist {
                tags: tags.join(", "),
            })?;
        specialists.push(fallback.id.clone());
        tracing::debug!(fallback = %fallback.id, "no tag matched, using fallback specialist");
    }

    // Multi-agent work pulls each selected specialist's partners, one level
    // only.
    if req.intent.complexity == Complexity::MultiAgent {
        let selected = specialists.clone();
        for id in &selected {
            let def = ctx.registry.get(id)?;
            for partner in &def.partners {
                if !specialists.contains(partner) {
                    specialists.push(partner.clone());
                }
            }
        }
    }

    let tool = req
        .tool_override
        .unwrap_or_else(|| req.intent.complexity.tool());
    let tool_command = ctx.config.tools.command_for(tool).clone();

    let (briefing, warnings) = compose_briefing(&specialists, ctx)?;

    let mut args: BTreeMap<String, String> = BTreeMap::new();
    args.insert("specialists".to_string(), specialists.join(","));
    if tool == ToolKind::Swarm {
        args.insert("agents".to_string(), specialists.len().to_string());
    }
    if !briefing.is_empty() {
        args.insert("append-system-prompt".to_string(), briefing.clone());
    }

    Ok(OrchestrationPlan {
        id: Uuid::new_v4(),
        request: req.text.to_string(),
        intent: req.intent.clone(),
        specialists,
        tool,
        tool_command,
        args,
        briefing,
        warnings,
        created_at: Utc::now(),
    })
}

/// One `## <name>` section per specialist with a briefing, references
/// inlined. Reference failures degrade to warnings, never to plan failure.
fn compose_briefing(
    specialists: &[String],
    ctx: &PlanContext,
) -> Result<(String, Vec<String>)> {
    let mut briefing = String::new();
    let mut warnings = Vec::new();
    for id in specialists {
        let def = ctx.registry.get(id)?;
        if def.briefing.is_empty() {
            continue;
        }
        let expanded = ctx.resolver.expand(&def.briefing);
        if !briefing.is_empty() {
            briefing.push_str("\n\n");
        }
        briefing.push_str("## ");
        briefing.push_str(def.display_name());
        briefing.push_str("\n\n");
        briefing.push_str(expanded.text.trim_end());
        warnings.extend(expanded.warnings);
    }
    Ok((briefing, warnings))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
