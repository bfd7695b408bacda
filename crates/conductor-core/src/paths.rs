use crate::error::{ConductorError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CONDUCTOR_DIR: &str = ".conductor";
pub const SPECIALISTS_DIR: &str = ".conductor/specialists";
pub const PATTERNS_DIR: &str = ".conductor/patterns";

pub const CONFIG_FILE: &str = ".conductor/config.yaml";

/// User-scope overlay, resolved against the home directory.
pub const USER_SPECIALISTS_DIR: &str = ".conductor/specialists";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn conductor_dir(root: &Path) -> PathBuf {
    root.join(CONDUCTOR_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn specialists_dir(root: &Path) -> PathBuf {
    root.join(SPECIALISTS_DIR)
}

pub fn patterns_dir(root: &Path) -> PathBuf {
    root.join(PATTERNS_DIR)
}

/// `~/.conductor/specialists`, the user-level specialist overlay. Project
/// definitions shadow user ones with the same id.
pub fn user_specialists_dir() -> Option<PathBuf> {
    home::home_dir().map(|h| h.join(USER_SPECIALISTS_DIR))
}

// ---------------------------------------------------------------------------
// Specialist id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_specialist_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(ConductorError::InvalidSpecialistId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
