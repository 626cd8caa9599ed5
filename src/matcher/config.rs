use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillMatchError};

/// What to do with a row whose skills column fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Drop the row, log a warning and list it in the `LoadReport`
    #[default]
    Skip,
    /// Fail the whole load on the first bad row
    Abort,
}

/// Matcher configuration
/// Limits used when the caller does not pass one explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// skills shown per category chart
    pub default_top_skills: usize,
    /// jobs returned by a skill selection query
    pub default_top_jobs: usize,
    /// entries kept in the aggregate frequency view
    pub frequency_view_limit: usize,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            default_top_skills: 10,
            default_top_jobs: 5,
            frequency_view_limit: 50,
            malformed_rows: MalformedRowPolicy::Skip,
        }
    }
}

impl MatcherConfig {
    /// Reject limits of zero
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("default_top_skills", self.default_top_skills),
            ("default_top_jobs", self.default_top_jobs),
            ("frequency_view_limit", self.frequency_view_limit),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(SkillMatchError::InvalidArgument(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_top_jobs, 5);
        assert_eq!(config.malformed_rows, MalformedRowPolicy::Skip);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = MatcherConfig { default_top_jobs: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(SkillMatchError::InvalidArgument(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: MatcherConfig =
            serde_json::from_str(r#"{"default_top_skills": 3, "malformed_rows": "abort"}"#).unwrap();
        assert_eq!(config.default_top_skills, 3);
        assert_eq!(config.default_top_jobs, 5);
        assert_eq!(config.frequency_view_limit, 50);
        assert_eq!(config.malformed_rows, MalformedRowPolicy::Abort);
    }
}
