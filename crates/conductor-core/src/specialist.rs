//! Specialist definitions and their on-disk form.
//!
//! A specialist is a named agent persona with capability tags, preferred
//! tools, and an optional briefing. Definitions are YAML files under
//! `.conductor/specialists/` (one specialist per file, any nesting), with a
//! user-level overlay in `~/.conductor/specialists` for ids the project does
//! not define.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConductorError, Result};
use crate::paths::validate_specialist_id;
use crate::types::ToolKind;

// ---------------------------------------------------------------------------
// SpecialistDefinition
// ---------------------------------------------------------------------------

fn default_tools() -> Vec<ToolKind> {
    vec![ToolKind::SingleAgent]
}

fn tools_are_default(tools: &[ToolKind]) -> bool {
    tools == [ToolKind::SingleAgent]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialistDefinition {
    pub id: String,
    /// Display name; falls back to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Capability tags, most specific first. Required, non-empty.
    pub tags: Vec<String>,
    /// Preferred tools in preference order.
    #[serde(default = "default_tools", skip_serializing_if = "tools_are_default")]
    pub tools: Vec<ToolKind>,
    /// Ids of specialists pulled in alongside this one on multi-agent work.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partners: Vec<String>,
    /// Prompt preamble contributed to the plan briefing. May embed @refs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub briefing: String,
}

impl SpecialistDefinition {
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn preferred_tool(&self) -> ToolKind {
        self.tools.first().copied().unwrap_or(ToolKind::SingleAgent)
    }

    pub fn supports(&self, kind: ToolKind) -> bool {
        self.tools.contains(&kind)
    }

    fn check(&self, path: &Path) -> Result<()> {
        if validate_specialist_id(&self.id).is_err() {
            return Err(ConductorError::MalformedSpecialist {
                path: path.display().to_string(),
                reason: format!("invalid specialist id '{}'", self.id),
            });
        }
        if self.tags.is_empty() {
            return Err(ConductorError::MalformedSpecialist {
                path: path.display().to_string(),
                reason: format!("specialist '{}' has no tags", self.id),
            });
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ConductorError::MalformedSpecialist {
                path: path.display().to_string(),
                reason: format!("specialist '{}' has an empty tag", self.id),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// A definition together with the file it came from, for duplicate
/// reporting.
#[derive(Debug, Clone)]
pub struct LoadedSpecialist {
    pub path: PathBuf,
    pub def: SpecialistDefinition,
}

pub fn load_specialist_file(path: &Path) -> Result<SpecialistDefinition> {
    let raw = std::fs::read_to_string(path)?;
    let def: SpecialistDefinition =
        serde_yaml::from_str(&raw).map_err(|e| ConductorError::MalformedSpecialist {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    def.check(path)?;
    Ok(def)
}

fn collect_yaml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_yaml_files(&path, out)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        ) {
            out.push(path);
        }
    }
    Ok(())
}

/// Load every definition under `dir`, sorted by path. A missing directory
/// is an empty layer, not an error. Duplicate ids within one layer are
/// fatal.
pub fn load_layer(dir: &Path) -> Result<Vec<LoadedSpecialist>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    collect_yaml_files(dir, &mut files)?;
    // Declaration order is lexicographic path order, stable across platforms.
    files.sort();

    let mut loaded: Vec<LoadedSpecialist> = Vec::with_capacity(files.len());
    for path in files {
        let def = load_specialist_file(&path)?;
        if let Some(existing) = loaded.iter().find(|l| l.def.id == def.id) {
            return Err(ConductorError::DuplicateSpecialist {
                id: def.id,
                first: existing.path.display().to_string(),
                second: path.display().to_string(),
            });
        }
        loaded.push(LoadedSpecialist { path, def });
    }
    Ok(loaded)
}

/// Project definitions plus the user overlay. Project ids shadow user ids;
/// user-only definitions are appended after the project layer.
pub fn load_specialists(
    project_dir: &Path,
    user_dir: Option<&Path>,
) -> Result<Vec<SpecialistDefinition>> {
    let mut layers = load_layer(project_dir)?;
    if let Some(user_dir) = user_dir {
        let project_ids: Vec<String> = layers.iter().map(|l| l.def.id.clone()).collect();
        for loaded in load_layer(user_dir)? {
            if project_ids.contains(&loaded.def.id) {
                tracing::debug!(id = %loaded.def.id, "project specialist shadows user definition");
                continue;
            }
            layers.push(loaded);
        }
    }
    Ok(layers.into_iter().map(|l| l.def).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
