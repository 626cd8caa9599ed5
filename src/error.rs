use thiserror::Error;

/// Errors raised by the skill matcher.
/// Every variant is recoverable by the caller; the matcher never leaves
/// shared state half-updated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillMatchError {
    /// A raw record's skills column could not be decoded into a skill→count mapping
    #[error("malformed record at row {row} (category {category:?}): {reason}")]
    MalformedRecord {
        row: usize,
        category: String,
        reason: String,
    },

    /// No record carries the requested category
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// A skill is missing from the universe used for the incidence table.
    /// `job` is `None` when the skill came from a caller selection.
    #[error("unknown skill {skill:?}{}", in_job(.job))]
    UnknownSkill {
        skill: String,
        job: Option<String>,
    },

    /// Out-of-range limit or empty selection
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn in_job(job: &Option<String>) -> String {
    job.as_ref().map(|j| format!(" in job {j:?}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SkillMatchError>;
