//! This crate aggregates skill frequencies from job postings and matches job categories to skill selections.
pub mod error;
pub mod matcher;
pub mod utils;

/// Skill Matcher
/// The top-level struct of this crate, owning one loaded dataset and the
/// structures derived from it.
///
/// Internally, it holds:
/// - The record store (one record per job category)
/// - The skill universe (sorted distinct skill names = incidence columns)
/// - The aggregate skill frequency
/// - The job × skill incidence table
///
/// Derived structures are computed lazily on first access and then shared
/// read-only, so a `&SkillMatcher` can answer queries from several threads.
/// `reload` swaps the dataset and drops every derived structure.
///
/// # Ordering
/// - top-k skills: count descending, then skill name ascending
/// - job ranking: score descending, then dataset row order
pub use matcher::SkillMatcher;

/// Matcher Configuration
/// Default limits (top skills per category, top jobs per query, frequency
/// view size) and the policy for malformed rows.
///
/// # Serialization
/// Supported. Missing fields fall back to defaults.
pub use matcher::config::{MalformedRowPolicy, MatcherConfig};

/// Record Store
/// Load-ordered, immutable sequence of `(category, skill → count)` records.
/// Raw skills columns are decoded by a strict literal parser
/// (`{'python': 5, 'sql': 2}`); malformed rows are skipped and reported or
/// abort the load depending on `MalformedRowPolicy`.
///
/// Lookup by category returns the first matching record when categories repeat.
pub use matcher::store::{LoadReport, RejectedRow, SkillRecord, SkillRecordStore};

/// Skill Frequency structure
/// Skill name → occurrence count table, used for single records and for the
/// dataset-wide aggregate.
pub use matcher::skill::SkillFrequency;

/// Aggregation
/// - `all_skill_names`: sorted distinct skill names of a store
/// - `aggregate_frequency`: per-skill totals, independent of record order
/// - `top_k`: the `k` most frequent skills with a name tie-break
pub use matcher::aggregate::{aggregate_frequency, all_skill_names, top_k, SkillUniverse};

/// Incidence table
/// One presence vector per record, one column per universe skill.
/// Counts are reduced to 0/1.
pub use matcher::incidence::{IncidenceMatrix, IncidenceRow};

/// Job Matching
/// - `match_jobs`: rank rows by how many selected skills they contain
/// - `JobMatches`: ranked result; `matched()` drops zero scores
/// - `MatchScore`: one job and its score
pub use matcher::evaluate::scoring::{match_jobs, JobMatches, MatchScore};

pub use error::{Result, SkillMatchError};
