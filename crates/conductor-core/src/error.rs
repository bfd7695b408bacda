use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConductorError {
    #[error("not initialized: run 'conductor init'")]
    NotInitialized,

    #[error("invalid specialist id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSpecialistId(String),

    #[error("duplicate specialist id '{id}' (first declared in {first}, again in {second})")]
    DuplicateSpecialist {
        id: String,
        first: String,
        second: String,
    },

    #[error("specialist '{specialist}' declares unknown partner '{partner}'")]
    UnknownPartner {
        specialist: String,
        partner: String,
    },

    #[error("fallback specialist '{0}' is not defined")]
    UnknownFallback(String),

    #[error("specialist not found: {0}")]
    SpecialistNotFound(String),

    #[error("malformed specialist definition {path}: {reason}")]
    MalformedSpecialist { path: String, reason: String },

    #[error("reference not found: @{0}")]
    ReferenceNotFound(String),

    #[error("section '#{section}' not found in @{path}")]
    SectionNotFound { path: String, section: String },

    #[error("reference cycle detected: {0}")]
    CycleDetected(String),

    #[error("invalid reference token '{0}'")]
    InvalidReference(String),

    #[error("no specialist matches tags [{tags}] and no fallback is configured")]
    NoSpecialist { tags: String },

    #[error("unknown tool '{0}': expected 'single_agent' or 'swarm'")]
    UnknownTool(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid complexity tier: {0}")]
    InvalidComplexity(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConductorError>;
