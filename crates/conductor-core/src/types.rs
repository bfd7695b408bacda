use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Build,
    Review,
    Debug,
    Test,
    Deploy,
    Research,
    Other,
}

impl TaskCategory {
    pub fn all() -> &'static [TaskCategory] {
        &[
            TaskCategory::Build,
            TaskCategory::Review,
            TaskCategory::Debug,
            TaskCategory::Test,
            TaskCategory::Deploy,
            TaskCategory::Research,
            TaskCategory::Other,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Build => "build",
            TaskCategory::Review => "review",
            TaskCategory::Debug => "debug",
            TaskCategory::Test => "test",
            TaskCategory::Deploy => "deploy",
            TaskCategory::Research => "research",
            TaskCategory::Other => "other",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = crate::error::ConductorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(TaskCategory::Build),
            "review" => Ok(TaskCategory::Review),
            "debug" => Ok(TaskCategory::Debug),
            "test" => Ok(TaskCategory::Test),
            "deploy" => Ok(TaskCategory::Deploy),
            "research" => Ok(TaskCategory::Research),
            "other" => Ok(TaskCategory::Other),
            _ => Err(crate::error::ConductorError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Complexity
// ---------------------------------------------------------------------------

/// Complexity tier of a request. Ordered: signals may only escalate a
/// request upward, never downward (`escalate` is a max).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Trivial,
    Focused,
    MultiAgent,
}

impl Complexity {
    pub fn all() -> &'static [Complexity] {
        &[
            Complexity::Trivial,
            Complexity::Focused,
            Complexity::MultiAgent,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Trivial => "trivial",
            Complexity::Focused => "focused",
            Complexity::MultiAgent => "multi_agent",
        }
    }

    /// Monotonic escalation: returns the higher of the two tiers.
    pub fn escalate(self, to: Complexity) -> Complexity {
        self.max(to)
    }

    /// The execution tool this tier selects by default.
    pub fn tool(self) -> ToolKind {
        match self {
            Complexity::Trivial | Complexity::Focused => ToolKind::SingleAgent,
            Complexity::MultiAgent => ToolKind::Swarm,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Complexity {
    type Err = crate::error::ConductorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trivial" => Ok(Complexity::Trivial),
            "focused" => Ok(Complexity::Focused),
            "multi_agent" | "multi-agent" => Ok(Complexity::MultiAgent),
            _ => Err(crate::error::ConductorError::InvalidComplexity(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// ToolKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    SingleAgent,
    Swarm,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[ToolKind::SingleAgent, ToolKind::Swarm]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::SingleAgent => "single_agent",
            ToolKind::Swarm => "swarm",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ToolKind {
    type Err = crate::error::ConductorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_agent" | "single-agent" | "agent" => Ok(ToolKind::SingleAgent),
            "swarm" => Ok(ToolKind::Swarm),
            _ => Err(crate::error::ConductorError::UnknownTool(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
