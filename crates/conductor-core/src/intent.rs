//! Keyword intent classification.
//!
//! Deterministic and rule-driven: no scoring model, no randomness. The
//! same input and rule set always produce the same intent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;
use crate::types::{Complexity, TaskCategory};

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// The classified reading of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub category: TaskCategory,
    pub complexity: Complexity,
    /// Heuristic confidence in [0.0, 1.0]. Empty input is 0.0; a request
    /// matching nothing is 0.2; each matched rule or domain adds 0.15 on a
    /// 0.45 base, capped at 0.95.
    pub confidence: f32,
    /// Domain tags that fired, in rule-table order, deduplicated.
    pub domains: Vec<String>,
    /// Ids of matcher rules that fired, in declaration order.
    pub matched: Vec<String>,
}

impl Intent {
    fn empty() -> Self {
        Intent {
            category: TaskCategory::Other,
            complexity: Complexity::Trivial,
            confidence: 0.0,
            domains: Vec::new(),
            matched: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// IntentClassifier
// ---------------------------------------------------------------------------

pub struct IntentClassifier {
    rules: RuleSet,
}

impl IntentClassifier {
    pub fn new(rules: RuleSet) -> Self {
        IntentClassifier { rules }
    }

    /// Classify a request. Total: every input produces an intent.
    pub fn classify(&self, text: &str) -> Intent {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Intent::empty();
        }

        let lowered = trimmed.to_lowercase();
        let words = tokenize(&lowered);

        let mut category: Option<TaskCategory> = None;
        let mut complexity = Complexity::Trivial;
        let mut matched: Vec<String> = Vec::new();

        for rule in &self.rules.matchers {
            if !rule
                .phrases
                .iter()
                .any(|p| phrase_hits(p, &lowered, &words))
            {
                continue;
            }
            matched.push(rule.id.clone());
            if category.is_none() {
                category = rule.category;
            }
            if let Some(tier) = rule.escalate_to {
                complexity = complexity.escalate(tier);
            }
        }

        let mut domains: Vec<String> = Vec::new();
        for domain in &self.rules.domains {
            if domain
                .phrases
                .iter()
                .any(|p| phrase_hits(p, &lowered, &words))
                && !domains.contains(&domain.tag)
            {
                domains.push(domain.tag.clone());
            }
        }

        // Signals only escalate: any hit lifts the baseline, crossing the
        // domain threshold lifts to multi-agent.
        if category.is_some() || !domains.is_empty() {
            complexity = complexity.escalate(Complexity::Focused);
        }
        if domains.len() >= self.rules.multi_domain_threshold as usize {
            complexity = complexity.escalate(Complexity::MultiAgent);
        }

        let signals = matched.len() + domains.len();
        let confidence = if signals == 0 {
            0.2
        } else {
            (0.45 + 0.15 * signals as f32).min(0.95)
        };

        Intent {
            category: category.unwrap_or(TaskCategory::Other),
            complexity,
            confidence,
            domains,
            matched,
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Word tokens of the lowered input. Hyphens and underscores stay inside
/// tokens so "front-end" matches as one word.
fn tokenize(lowered: &str) -> HashSet<&str> {
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map(|t| t.trim_matches(|c| c == '-' || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Single-word phrases match whole tokens; multi-word phrases match as
/// substrings. Keeps "latest" from firing a "test" phrase while letting
/// "production is down" match inside a sentence.
fn phrase_hits(phrase: &str, lowered: &str, words: &HashSet<&str>) -> bool {
    let phrase = phrase.to_lowercase();
    if phrase.contains(char::is_whitespace) {
        lowered.contains(phrase.as_str())
    } else {
        words.contains(phrase.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{default_rules, DomainRule, MatchRule};

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(default_rules())
    }

    fn assert_confidence(intent: &Intent, expected: f32) {
        assert!(
            (intent.confidence - expected).abs() < 1e-5,
            "confidence {} != {expected}",
            intent.confidence
        );
    }

    #[test]
    fn empty_input_is_other_trivial_zero() {
        for text in ["", "   ", "\n\t"] {
            let intent = classifier().classify(text);
            assert_eq!(intent.category, TaskCategory::Other);
            assert_eq!(intent.complexity, Complexity::Trivial);
            assert_confidence(&intent, 0.0);
            assert!(intent.domains.is_empty());
            assert!(intent.matched.is_empty());
        }
    }

    #[test]
    fn unmatched_input_has_low_confidence() {
        let intent = classifier().classify("hello there");
        assert_eq!(intent.category, TaskCategory::Other);
        assert_eq!(intent.complexity, Complexity::Trivial);
        assert_confidence(&intent, 0.2);
    }

    #[test]
    fn build_request_with_two_domains_goes_multi_agent() {
        let intent = classifier().classify("Build a React dashboard with authentication");
        assert_eq!(intent.category, TaskCategory::Build);
        assert_eq!(intent.domains, vec!["frontend", "security"]);
        assert_eq!(intent.complexity, Complexity::MultiAgent);
        assert_confidence(&intent, 0.90);
    }

    #[test]
    fn urgency_escalates_regardless_of_category() {
        let intent = classifier().classify("URGENT: production is down");
        assert_eq!(intent.category, TaskCategory::Other);
        assert_eq!(intent.complexity, Complexity::MultiAgent);
        assert!(intent.matched.contains(&"urgency".to_string()));
    }

    #[test]
    fn first_category_match_wins() {
        let intent = classifier().classify("review and fix the tests");
        assert_eq!(intent.category, TaskCategory::Review);
        assert_eq!(intent.matched, vec!["review", "debug", "test"]);
        assert_eq!(intent.complexity, Complexity::Focused);
    }

    #[test]
    fn single_words_match_on_word_boundaries() {
        let intent = classifier().classify("publish the latest changes");
        assert_eq!(intent.category, TaskCategory::Deploy);
        assert_eq!(intent.matched, vec!["deploy"]);
    }

    #[test]
    fn hyphenated_words_match_as_one_token() {
        let intent = classifier().classify("check the front-end rendering");
        assert_eq!(intent.domains, vec!["frontend"]);
    }

    #[test]
    fn frontend_and_backend_keywords_escalate() {
        let intent = classifier().classify("wire the frontend to the backend");
        assert_eq!(intent.domains, vec!["frontend", "backend"]);
        assert_eq!(intent.complexity, Complexity::MultiAgent);
    }

    #[test]
    fn domains_without_category_stay_other() {
        let intent = classifier().classify("optimize the api latency");
        assert_eq!(intent.category, TaskCategory::Other);
        assert_eq!(intent.domains, vec!["backend", "performance"]);
        assert_eq!(intent.complexity, Complexity::MultiAgent);
        assert_confidence(&intent, 0.75);
    }

    #[test]
    fn complexity_never_decreases_as_text_grows() {
        let classifier = classifier();
        let base = "fix the bug";
        let mut previous = classifier.classify(base).complexity;
        let mut text = base.to_string();
        for suffix in [" in the react ui", " touching the api", " urgent"] {
            text.push_str(suffix);
            let current = classifier.classify(&text).complexity;
            assert!(current >= previous, "complexity dropped on {text:?}");
            previous = current;
        }
        assert_eq!(previous, Complexity::MultiAgent);
    }

    #[test]
    fn confidence_caps_below_one() {
        let intent =
            classifier().classify("build test deploy the react api with docker, slow security");
        assert_confidence(&intent, 0.95);
        assert_eq!(intent.complexity, Complexity::MultiAgent);
    }

    #[test]
    fn classification_is_case_insensitive() {
        let intent = classifier().classify("BUILD a REACT app");
        assert_eq!(intent.category, TaskCategory::Build);
        assert_eq!(intent.domains, vec!["frontend"]);
    }

    #[test]
    fn threshold_one_escalates_on_single_domain() {
        let mut rules = default_rules();
        rules.multi_domain_threshold = 1;
        let classifier = IntentClassifier::new(rules);
        let intent = classifier.classify("tweak the css");
        assert_eq!(intent.domains, vec!["frontend"]);
        assert_eq!(intent.complexity, Complexity::MultiAgent);
    }

    #[test]
    fn extended_rules_participate() {
        let mut rules = default_rules();
        rules.extend(
            vec![MatchRule {
                id: "benchmark".to_string(),
                phrases: vec!["benchmark".to_string()],
                category: Some(TaskCategory::Research),
                escalate_to: None,
            }],
            vec![DomainRule {
                tag: "mobile".to_string(),
                phrases: vec!["ios".to_string()],
            }],
        );
        let classifier = IntentClassifier::new(rules);
        let intent = classifier.classify("benchmark the ios build times");
        assert!(intent.matched.contains(&"benchmark".to_string()));
        assert!(intent.domains.contains(&"mobile".to_string()));
    }

    #[test]
    fn same_input_same_intent() {
        let classifier = classifier();
        let a = classifier.classify("deploy the payment service");
        let b = classifier.classify("deploy the payment service");
        assert_eq!(a, b);
    }
}
