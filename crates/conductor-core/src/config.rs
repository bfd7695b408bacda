use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConductorError, Result};
use crate::io;
use crate::paths::{self, validate_specialist_id};
use crate::rules::{DomainRule, MatchRule, RuleSet};
use crate::types::ToolKind;

// ---------------------------------------------------------------------------
// Validation warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl WarnLevel {
    pub fn is_error(&self) -> bool {
        matches!(self, WarnLevel::Error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

impl ConfigWarning {
    pub fn warning(message: impl Into<String>) -> Self {
        ConfigWarning {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ConfigWarning {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            WarnLevel::Warning => write!(f, "warning: {}", self.message),
            WarnLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// How to invoke one routing target. `base_args` come before any
/// plan-derived flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_args: Vec<String>,
}

impl ToolCommand {
    fn single_agent_default() -> Self {
        ToolCommand {
            program: "claude".to_string(),
            base_args: vec!["--print".to_string()],
        }
    }

    fn swarm_default() -> Self {
        ToolCommand {
            program: "claude-flow".to_string(),
            base_args: vec!["swarm".to_string()],
        }
    }

    /// Absolute path of the program if it resolves on PATH.
    pub fn locate(&self) -> Option<std::path::PathBuf> {
        which::which(&self.program).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub single_agent: ToolCommand,
    pub swarm: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            single_agent: ToolCommand::single_agent_default(),
            swarm: ToolCommand::swarm_default(),
        }
    }
}

impl ToolsConfig {
    pub fn command_for(&self, kind: ToolKind) -> &ToolCommand {
        match kind {
            ToolKind::SingleAgent => &self.single_agent,
            ToolKind::Swarm => &self.swarm,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_domain_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_matchers: Vec<MatchRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_domains: Vec<DomainRule>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn default_version() -> u32 {
    1
}

fn default_docs_root() -> String {
    ".conductor".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    /// Directory @references resolve against, relative to the project
    /// root. Defaults to the conductor tree itself; set "." for repo-wide
    /// references.
    #[serde(default = "default_docs_root")]
    pub docs_root: String,
    /// Specialist routed to when nothing matches. Optional: without it a
    /// request that matches no specialist is an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_specialist: Option<String>,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Config {
    pub fn new(project_name: &str) -> Self {
        Config {
            version: 1,
            project: ProjectConfig {
                name: project_name.to_string(),
                description: None,
            },
            docs_root: default_docs_root(),
            fallback_specialist: Some("generalist".to_string()),
            tools: ToolsConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(ConductorError::NotInitialized);
        }
        let raw = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::config_path(root), yaml.as_bytes())
    }

    /// Directory @references resolve against.
    pub fn docs_root(&self, root: &Path) -> std::path::PathBuf {
        root.join(&self.docs_root)
    }

    /// Built-in rules plus any config-supplied extras.
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = crate::rules::default_rules();
        if let Some(threshold) = self.classifier.multi_domain_threshold {
            rules.multi_domain_threshold = threshold;
        }
        rules.extend(
            self.classifier.extra_matchers.clone(),
            self.classifier.extra_domains.clone(),
        );
        rules
    }

    /// Structural checks on the config itself. Registry-dependent checks
    /// (e.g. whether the fallback specialist exists) live in the registry.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (name, tool) in [
            ("single_agent", &self.tools.single_agent),
            ("swarm", &self.tools.swarm),
        ] {
            if tool.program.trim().is_empty() {
                warnings.push(ConfigWarning::error(format!(
                    "tools.{name}.program is empty"
                )));
            } else if tool.locate().is_none() {
                warnings.push(ConfigWarning::warning(format!(
                    "tools.{name}.program '{}' not found on PATH",
                    tool.program
                )));
            }
        }

        if let Some(fallback) = &self.fallback_specialist {
            if validate_specialist_id(fallback).is_err() {
                warnings.push(ConfigWarning::error(format!(
                    "fallback_specialist '{fallback}' is not a valid specialist id"
                )));
            }
        }

        if self.classifier.multi_domain_threshold == Some(0) {
            warnings.push(ConfigWarning::warning(
                "classifier.multi_domain_threshold is 0: every request escalates to multi-agent",
            ));
        }

        for matcher in &self.classifier.extra_matchers {
            if matcher.phrases.is_empty() {
                warnings.push(ConfigWarning::warning(format!(
                    "classifier matcher '{}' has no phrases and never fires",
                    matcher.id
                )));
            }
            if matcher.category.is_none() && matcher.escalate_to.is_none() {
                warnings.push(ConfigWarning::warning(format!(
                    "classifier matcher '{}' sets neither category nor escalate_to",
                    matcher.id
                )));
            }
        }

        for domain in &self.classifier.extra_domains {
            if domain.tag.trim().is_empty() {
                warnings.push(ConfigWarning::warning(
                    "classifier domain with empty tag".to_string(),
                ));
            }
            if domain.phrases.is_empty() {
                warnings.push(ConfigWarning::warning(format!(
                    "classifier domain '{}' has no phrases and never fires",
                    domain.tag
                )));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
