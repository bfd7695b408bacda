use crate::types::{Complexity, TaskCategory};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MatchRule / DomainRule
// ---------------------------------------------------------------------------

/// An ordered phrase matcher. Single-word phrases match on word boundaries;
/// multi-word phrases match as case-insensitive substrings.
///
/// A rule may set a category (first matching category rule wins), an
/// escalation tier (complexity is the max over all firing rules), or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchRule {
    pub id: String,
    pub phrases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to: Option<Complexity>,
}

/// Maps a domain capability tag to its trigger vocabulary. Each firing
/// domain contributes its tag to the intent once; two or more distinct
/// domains escalate complexity to multi-agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainRule {
    pub tag: String,
    pub phrases: Vec<String>,
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RuleSet {
    pub matchers: Vec<MatchRule>,
    pub domains: Vec<DomainRule>,
    /// Distinct-domain count at which complexity escalates to multi-agent.
    pub multi_domain_threshold: u32,
}

impl RuleSet {
    /// Append config-supplied rules after the built-ins. Built-in rules keep
    /// their declaration-order priority; extras are evaluated last.
    pub fn extend(&mut self, matchers: Vec<MatchRule>, domains: Vec<DomainRule>) {
        self.matchers.extend(matchers);
        self.domains.extend(domains);
    }
}

fn category_rule(id: &str, category: TaskCategory, phrases: &[&str]) -> MatchRule {
    MatchRule {
        id: id.to_string(),
        phrases: phrases.iter().map(|p| p.to_string()).collect(),
        category: Some(category),
        escalate_to: None,
    }
}

fn escalation_rule(id: &str, tier: Complexity, phrases: &[&str]) -> MatchRule {
    MatchRule {
        id: id.to_string(),
        phrases: phrases.iter().map(|p| p.to_string()).collect(),
        category: None,
        escalate_to: Some(tier),
    }
}

fn domain(tag: &str, phrases: &[&str]) -> DomainRule {
    DomainRule {
        tag: tag.to_string(),
        phrases: phrases.iter().map(|p| p.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Default rules (priority-ordered)
// ---------------------------------------------------------------------------

pub fn default_rules() -> RuleSet {
    RuleSet {
        matchers: vec![
            // Urgency overrides everything: straight to multi-agent.
            escalation_rule(
                "urgency",
                Complexity::MultiAgent,
                &[
                    "urgent",
                    "asap",
                    "emergency",
                    "production is down",
                    "production down",
                    "outage",
                    "sev1",
                ],
            ),
            // Whole-system scope needs parallel agents.
            escalation_rule(
                "cross_cutting",
                Complexity::MultiAgent,
                &[
                    "end-to-end",
                    "end to end",
                    "entire codebase",
                    "whole system",
                    "across the stack",
                ],
            ),
            // Category rules; first match in this order wins.
            category_rule(
                "build",
                TaskCategory::Build,
                &[
                    "build", "implement", "create", "add", "scaffold", "develop", "write",
                ],
            ),
            category_rule(
                "review",
                TaskCategory::Review,
                &["review", "refactor", "code quality", "clean up", "cleanup"],
            ),
            category_rule(
                "debug",
                TaskCategory::Debug,
                &[
                    "debug",
                    "troubleshoot",
                    "fix",
                    "broken",
                    "crash",
                    "error",
                    "bug",
                    "not working",
                ],
            ),
            category_rule(
                "test",
                TaskCategory::Test,
                &[
                    "test", "tests", "tdd", "coverage", "unit test", "integration test",
                ],
            ),
            category_rule(
                "deploy",
                TaskCategory::Deploy,
                &["deploy", "release", "ship", "rollout", "publish"],
            ),
            category_rule(
                "research",
                TaskCategory::Research,
                &[
                    "research",
                    "investigate",
                    "compare",
                    "evaluate",
                    "explore",
                    "analyze",
                ],
            ),
        ],
        domains: vec![
            domain(
                "frontend",
                &[
                    "frontend",
                    "front-end",
                    "react",
                    "vue",
                    "angular",
                    "ui",
                    "css",
                    "dashboard",
                    "component",
                ],
            ),
            domain(
                "backend",
                &[
                    "backend",
                    "back-end",
                    "api",
                    "server",
                    "database",
                    "endpoint",
                    "microservice",
                ],
            ),
            domain(
                "security",
                &[
                    "security",
                    "auth",
                    "authentication",
                    "authorization",
                    "vulnerability",
                    "encryption",
                    "xss",
                ],
            ),
            domain(
                "devops",
                &[
                    "devops",
                    "docker",
                    "kubernetes",
                    "pipeline",
                    "terraform",
                    "infrastructure",
                ],
            ),
            domain(
                "data",
                &[
                    "data pipeline",
                    "analytics",
                    "etl",
                    "sql",
                    "machine learning",
                ],
            ),
            domain(
                "performance",
                &["performance", "slow", "latency", "optimize", "profiling"],
            ),
        ],
        multi_domain_threshold: 2,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_have_unique_ids() {
        let rules = default_rules();
        let mut ids: Vec<&str> = rules.matchers.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.matchers.len());
    }

    #[test]
    fn default_rules_cover_every_real_category() {
        let rules = default_rules();
        for category in TaskCategory::all() {
            if *category == TaskCategory::Other {
                continue;
            }
            assert!(
                rules.matchers.iter().any(|m| m.category == Some(*category)),
                "no matcher for category {category}"
            );
        }
    }

    #[test]
    fn urgency_rule_escalates_to_multi_agent() {
        let rules = default_rules();
        let urgency = rules.matchers.iter().find(|m| m.id == "urgency").unwrap();
        assert_eq!(urgency.escalate_to, Some(Complexity::MultiAgent));
        assert!(urgency.phrases.iter().any(|p| p == "production is down"));
    }

    #[test]
    fn extend_appends_after_builtins() {
        let mut rules = default_rules();
        let builtin_count = rules.matchers.len();
        rules.extend(
            vec![MatchRule {
                id: "docs".to_string(),
                phrases: vec!["document".to_string()],
                category: Some(TaskCategory::Other),
                escalate_to: None,
            }],
            vec![],
        );
        assert_eq!(rules.matchers.len(), builtin_count + 1);
        assert_eq!(rules.matchers.last().unwrap().id, "docs");
    }

    #[test]
    fn match_rule_yaml_roundtrip() {
        let rule = MatchRule {
            id: "infra".to_string(),
            phrases: vec!["provision".to_string(), "cloud".to_string()],
            category: Some(TaskCategory::Deploy),
            escalate_to: Some(Complexity::Focused),
        };
        let yaml = serde_yaml::to_string(&rule).unwrap();
        let parsed: MatchRule = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.id, "infra");
        assert_eq!(parsed.category, Some(TaskCategory::Deploy));
        assert_eq!(parsed.escalate_to, Some(Complexity::Focused));
    }

    #[test]
    fn match_rule_optional_fields_omitted() {
        let rule = MatchRule {
            id: "urgency".to_string(),
            phrases: vec!["urgent".to_string()],
            category: None,
            escalate_to: None,
        };
        let yaml = serde_yaml::to_string(&rule).unwrap();
        assert!(!yaml.contains("category"));
        assert!(!yaml.contains("escalate_to"));
    }
}
