//! The specialist registry: validated, immutable, tag-indexed.
//!
//! Built once at startup from the loaded definitions. Partner references and
//! the configured fallback are checked here so routing can assume every id
//! it touches exists.

use std::collections::HashMap;
use std::path::Path;

use crate::config::Config;
use crate::error::{ConductorError, Result};
use crate::paths;
use crate::specialist::{self, SpecialistDefinition};

#[derive(Debug)]
pub struct SpecialistRegistry {
    defs: Vec<SpecialistDefinition>,
    by_id: HashMap<String, usize>,
    /// Per-tag indices ranked by specificity: fewer declared tags first,
    /// declaration order as tiebreak.
    by_tag: HashMap<String, Vec<usize>>,
    fallback: Option<usize>,
}

impl SpecialistRegistry {
    /// Validate and index a set of definitions. `defs` order is declaration
    /// order and is preserved by `all()`.
    pub fn build(defs: Vec<SpecialistDefinition>, fallback: Option<&str>) -> Result<Self> {
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if let Some(first) = by_id.insert(def.id.clone(), i) {
                return Err(ConductorError::DuplicateSpecialist {
                    id: def.id.clone(),
                    first: format!("definition {first}"),
                    second: format!("definition {i}"),
                });
            }
        }

        for def in &defs {
            for partner in &def.partners {
                if !by_id.contains_key(partner) {
                    return Err(ConductorError::UnknownPartner {
                        specialist: def.id.clone(),
                        partner: partner.clone(),
                    });
                }
            }
        }

        let fallback = match fallback {
            Some(id) => Some(
                *by_id
                    .get(id)
                    .ok_or_else(|| ConductorError::UnknownFallback(id.to_string()))?,
            ),
            None => None,
        };

        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, def) in defs.iter().enumerate() {
            for tag in &def.tags {
                by_tag.entry(tag.clone()).or_default().push(i);
            }
        }
        for indices in by_tag.values_mut() {
            indices.sort_by_key(|&i| (defs[i].tags.len(), i));
        }

        Ok(SpecialistRegistry {
            defs,
            by_id,
            by_tag,
            fallback,
        })
    }

    /// Load from explicit directories. Project definitions shadow the user
    /// layer.
    pub fn load_from(
        project_dir: &Path,
        user_dir: Option<&Path>,
        fallback: Option<&str>,
    ) -> Result<Self> {
        let defs = specialist::load_specialists(project_dir, user_dir)?;
        Self::build(defs, fallback)
    }

    /// Load for a project root using the standard layout and the user
    /// overlay under the home directory.
    pub fn load(root: &Path, config: &Config) -> Result<Self> {
        let user_dir = paths::user_specialists_dir();
        Self::load_from(
            &paths::specialists_dir(root),
            user_dir.as_deref(),
            config.fallback_specialist.as_deref(),
        )
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions in declaration order.
    pub fn all(&self) -> &[SpecialistDefinition] {
        &self.defs
    }

    pub fn get(&self, id: &str) -> Result<&SpecialistDefinition> {
        self.by_id
            .get(id)
            .map(|&i| &self.defs[i])
            .ok_or_else(|| ConductorError::SpecialistNotFound(id.to_string()))
    }

    /// Specialists declaring `tag`, most specific first.
    pub fn lookup(&self, tag: &str) -> Vec<&SpecialistDefinition> {
        self.by_tag
            .get(tag)
            .map(|indices| indices.iter().map(|&i| &self.defs[i]).collect())
            .unwrap_or_default()
    }

    /// Top-ranked specialist for `tag`, if any declares it.
    pub fn best_for(&self, tag: &str) -> Option<&SpecialistDefinition> {
        self.by_tag.get(tag).map(|indices| &self.defs[indices[0]])
    }

    pub fn fallback(&self) -> Option<&SpecialistDefinition> {
        self.fallback.map(|i| &self.defs[i])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, tags: &[&str], partners: &[&str]) -> SpecialistDefinition {
        SpecialistDefinition {
            id: id.to_string(),
            title: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            tools: vec![crate::types::ToolKind::SingleAgent],
            partners: partners.iter().map(|p| p.to_string()).collect(),
            briefing: String::new(),
        }
    }

    #[test]
    fn unknown_partner_is_fatal() {
        let defs = vec![def("frontend-engineer", &["frontend"], &["ghost"])];
        let err = SpecialistRegistry::build(defs, None).unwrap_err();
        match err {
            ConductorError::UnknownPartner {
                specialist,
                partner,
            } => {
                assert_eq!(specialist, "frontend-engineer");
                assert_eq!(partner, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fallback_is_fatal() {
        let defs = vec![def("helper", &["general"], &[])];
        let err = SpecialistRegistry::build(defs, Some("ghost")).unwrap_err();
        assert!(matches!(err, ConductorError::UnknownFallback(_)));
    }

    #[test]
    fn mutual_partners_are_legal() {
        let defs = vec![
            def("frontend-engineer", &["frontend"], &["backend-engineer"]),
            def("backend-engineer", &["backend"], &["frontend-engineer"]),
        ];
        let registry = SpecialistRegistry::build(defs, None).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn get_finds_by_id() {
        let defs = vec![def("helper", &["general"], &[])];
        let registry = SpecialistRegistry::build(defs, None).unwrap();
        assert_eq!(registry.get("helper").unwrap().id, "helper");
        assert!(matches!(
            registry.get("ghost").unwrap_err(),
            ConductorError::SpecialistNotFound(_)
        ));
    }

    #[test]
    fn lookup_ranks_fewer_tags_first() {
        let defs = vec![
            def("generalist", &["coding", "review", "analysis", "testing"], &[]),
            def("coder", &["coding"], &[]),
            def("pairer", &["coding", "review"], &[]),
        ];
        let registry = SpecialistRegistry::build(defs, None).unwrap();
        let ranked: Vec<&str> = registry
            .lookup("coding")
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["coder", "pairer", "generalist"]);
        assert_eq!(registry.best_for("coding").unwrap().id, "coder");
    }

    #[test]
    fn lookup_ties_break_by_declaration_order() {
        let defs = vec![
            def("first", &["coding"], &[]),
            def("second", &["coding"], &[]),
        ];
        let registry = SpecialistRegistry::build(defs, None).unwrap();
        let ranked: Vec<&str> = registry
            .lookup("coding")
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["first", "second"]);
    }

    #[test]
    fn lookup_unknown_tag_is_empty() {
        let registry = SpecialistRegistry::build(vec![def("helper", &["general"], &[])], None).unwrap();
        assert!(registry.lookup("ghost").is_empty());
        assert!(registry.best_for("ghost").is_none());
    }

    #[test]
    fn fallback_accessor() {
        let defs = vec![def("generalist", &["general"], &[])];
        let registry = SpecialistRegistry::build(defs, Some("generalist")).unwrap();
        assert_eq!(registry.fallback().unwrap().id, "generalist");

        let registry = SpecialistRegistry::build(vec![def("helper", &["x"], &[])], None).unwrap();
        assert!(registry.fallback().is_none());
    }
}
