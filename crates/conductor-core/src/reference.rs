//! `@path#section` reference resolution.
//!
//! Briefings and pattern documents may embed references to other documents
//! (`@patterns/frontend.md#component-structure`). Resolution reads the file
//! relative to the docs root, optionally narrows to one markdown section,
//! and caches the fragment until the file's mtime changes.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::error::{ConductorError, Result};

/// Ancestor chain longer than this aborts expansion. Backstop for cycles
/// the visited set should already have caught.
const MAX_EXPANSION_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// RefToken
// ---------------------------------------------------------------------------

/// A parsed `@path` or `@path#section` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefToken {
    pub path: String,
    pub section: Option<String>,
}

impl RefToken {
    /// Parse a token with or without the leading `@`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(ConductorError::InvalidReference(raw.to_string()));
        }
        let (path, section) = match body.split_once('#') {
            Some((path, section)) => (path, Some(section)),
            None => (body, None),
        };
        if path.is_empty() || path.chars().any(char::is_whitespace) {
            return Err(ConductorError::InvalidReference(raw.to_string()));
        }
        if let Some(section) = section {
            if section.is_empty() || section.chars().any(char::is_whitespace) {
                return Err(ConductorError::InvalidReference(raw.to_string()));
            }
        }
        Ok(RefToken {
            path: path.to_string(),
            section: section.map(str::to_string),
        })
    }
}

impl fmt::Display for RefToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "@{}#{}", self.path, section),
            None => write!(f, "@{}", self.path),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A resolved fragment with the time its content was read from disk.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub text: String,
    pub resolved_at: DateTime<Utc>,
}

/// Result of expanding prose that may embed references. Unresolvable
/// references are replaced by empty fragments and reported here.
#[derive(Debug, Clone, Default)]
pub struct Expanded {
    pub text: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fragment: String,
    mtime: SystemTime,
    resolved_at: DateTime<Utc>,
}

type CacheKey = (PathBuf, Option<String>);

// ---------------------------------------------------------------------------
// ReferenceResolver
// ---------------------------------------------------------------------------

pub struct ReferenceResolver {
    docs_root: PathBuf,
    cache: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ReferenceResolver {
    pub fn new(docs_root: impl Into<PathBuf>) -> Self {
        ReferenceResolver {
            docs_root: docs_root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve one reference to its fragment. Serves from cache while the
    /// file's mtime is unchanged; re-reads otherwise.
    pub fn resolve(&self, token: &RefToken) -> Result<Resolution> {
        let rel = sanitize_path(&token.path)?;
        let abs = self.docs_root.join(&rel);
        let mtime = std::fs::metadata(&abs)
            .map_err(|_| ConductorError::ReferenceNotFound(token.path.clone()))?
            .modified()?;

        let key: CacheKey = (rel, token.section.clone());
        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(&key) {
                if entry.mtime == mtime {
                    return Ok(Resolution {
                        text: entry.fragment.clone(),
                        resolved_at: entry.resolved_at,
                    });
                }
            }
        }

        let raw = std::fs::read_to_string(&abs)
            .map_err(|_| ConductorError::ReferenceNotFound(token.path.clone()))?;
        let fragment = match &token.section {
            Some(anchor) => {
                narrow_to_section(&raw, anchor).ok_or_else(|| ConductorError::SectionNotFound {
                    path: token.path.clone(),
                    section: anchor.clone(),
                })?
            }
            None => raw,
        };

        let resolved_at = Utc::now();
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(
                key,
                CacheEntry {
                    fragment: fragment.clone(),
                    mtime,
                    resolved_at,
                },
            );
        }
        Ok(Resolution {
            text: fragment,
            resolved_at,
        })
    }

    /// Inline every reference in `text`, recursively expanding references
    /// inside resolved fragments. Never fails: an unresolvable or cyclic
    /// reference becomes an empty fragment plus a warning.
    pub fn expand(&self, text: &str) -> Expanded {
        let mut warnings = Vec::new();
        let mut visited = HashSet::new();
        let text = self.expand_inner(text, &mut visited, &mut warnings, 0);
        Expanded { text, warnings }
    }

    fn expand_inner(
        &self,
        text: &str,
        visited: &mut HashSet<CacheKey>,
        warnings: &mut Vec<String>,
        depth: usize,
    ) -> String {
        if depth >= MAX_EXPANSION_DEPTH {
            warnings.push(format!(
                "reference expansion aborted at depth {MAX_EXPANSION_DEPTH}"
            ));
            tracing::warn!(depth = MAX_EXPANSION_DEPTH, "reference expansion too deep");
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last_end = 0;
        for caps in ref_token_regex().captures_iter(text) {
            let matched = caps.get(0).map(|m| (m.start(), m.end()));
            let Some((start, end)) = matched else { continue };
            out.push_str(&text[last_end..start]);
            last_end = end;

            // Trailing sentence punctuation belongs to the prose, not the path.
            let raw_path = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let path = raw_path.trim_end_matches(['.', ',']);
            let trimmed = raw_path.len() - path.len();
            let token = RefToken {
                path: path.to_string(),
                section: caps.get(2).map(|m| m.as_str().to_string()),
            };

            if let Some(fragment) = self.expand_token(&token, visited, warnings, depth) {
                out.push_str(&fragment);
            }
            if trimmed > 0 {
                out.push_str(&raw_path[raw_path.len() - trimmed..]);
            }
        }
        out.push_str(&text[last_end..]);
        out
    }

    fn expand_token(
        &self,
        token: &RefToken,
        visited: &mut HashSet<CacheKey>,
        warnings: &mut Vec<String>,
        depth: usize,
    ) -> Option<String> {
        let key: CacheKey = match sanitize_path(&token.path) {
            Ok(rel) => (rel, token.section.clone()),
            Err(e) => {
                warnings.push(format!("could not resolve {token}: {e}"));
                tracing::warn!(reference = %token, error = %e, "reference degraded");
                return None;
            }
        };
        if !visited.insert(key.clone()) {
            let e = ConductorError::CycleDetected(token.to_string());
            warnings.push(e.to_string());
            tracing::warn!(reference = %token, "reference cycle");
            return None;
        }
        let result = match self.resolve(token) {
            Ok(resolution) => Some(self.expand_inner(&resolution.text, visited, warnings, depth + 1)),
            Err(e) => {
                warnings.push(format!("could not resolve {token}: {e}"));
                tracing::warn!(reference = %token, error = %e, "reference degraded");
                None
            }
        };
        // The visited set tracks ancestors only: the same document referenced
        // twice along sibling branches is legal.
        visited.remove(&key);
        result
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

static REF_TOKEN: OnceLock<Regex> = OnceLock::new();

fn ref_token_regex() -> &'static Regex {
    REF_TOKEN
        .get_or_init(|| Regex::new(r"@([A-Za-z0-9_][A-Za-z0-9_./\-]*)(?:#([A-Za-z0-9_\-]+))?").unwrap())
}

/// Normalize a reference path. Absolute paths and parent traversal cannot
/// escape the docs root and are treated as unresolvable.
fn sanitize_path(raw: &str) -> Result<PathBuf> {
    let path = Path::new(raw);
    if path.is_absolute() {
        return Err(ConductorError::ReferenceNotFound(raw.to_string()));
    }
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return Err(ConductorError::ReferenceNotFound(raw.to_string())),
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(ConductorError::InvalidReference(raw.to_string()));
    }
    Ok(clean)
}

/// GitHub-style heading slug: lowercase, spaces to hyphens, punctuation
/// other than hyphen/underscore dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if c == ' ' {
            slug.push('-');
        } else if c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug
}

/// Slice out the section whose heading slug matches `anchor`. The fragment
/// starts at the heading line and ends before the next heading of equal or
/// higher level. Headings inside fenced code blocks are ignored.
fn narrow_to_section(raw: &str, anchor: &str) -> Option<String> {
    let want = slugify(anchor);
    let mut in_fence = false;
    let mut fragment: Option<(usize, Vec<&str>)> = None;

    for line in raw.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        let heading_level = if in_fence { None } else { heading_level(line) };

        match (&mut fragment, heading_level) {
            (Some((level, lines)), Some(found)) if found <= *level => {
                return Some(lines.join("\n"));
            }
            (Some((_, lines)), _) => lines.push(line),
            (None, Some(level)) => {
                let text = line.trim_start_matches('#').trim();
                if slugify(text) == want {
                    fragment = Some((level, vec![line]));
                }
            }
            (None, None) => {}
        }
    }
    fragment.map(|(_, lines)| lines.join("\n"))
}

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line.as_bytes().get(hashes) {
        Some(b' ') => Some(hashes),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
