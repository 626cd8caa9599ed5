use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{Result, SkillMatchError},
    matcher::{config::MalformedRowPolicy, skill::SkillFrequency},
    utils::literal::parse_skill_mapping,
};

/// One job category with its skill → count mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub category: String,
    pub skills: SkillFrequency,
}

impl SkillRecord {
    pub fn new(category: impl Into<String>, skills: SkillFrequency) -> Self {
        Self { category: category.into(), skills }
    }
}

/// A row that was dropped during a skipping load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 0-based position in the raw input
    pub row: usize,
    pub category: String,
    pub reason: String,
}

/// Outcome of a load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Immutable, load-ordered sequence of `SkillRecord`s.
/// Categories are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecordStore {
    records: Vec<SkillRecord>,
}

impl SkillRecordStore {
    /// Build a store from already decoded records
    pub fn from_records(records: Vec<SkillRecord>) -> Self {
        Self { records }
    }

    /// Decode raw `(category, skills literal)` rows
    ///
    /// # Arguments
    /// * `rows` - raw rows in load order
    /// * `policy` - `Skip` drops and reports bad rows, `Abort` fails on the first one
    ///
    /// # Returns
    /// * the store and a report of what was kept and dropped
    pub fn load<I, C, S>(rows: I, policy: MalformedRowPolicy) -> Result<(Self, LoadReport)>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (row, (category, raw)) in rows.into_iter().enumerate() {
            let category = category.as_ref();
            match Self::decode_row(category, raw.as_ref()) {
                Ok(record) => records.push(record),
                Err(reason) => match policy {
                    MalformedRowPolicy::Abort => {
                        return Err(SkillMatchError::MalformedRecord {
                            row,
                            category: category.to_string(),
                            reason,
                        });
                    }
                    MalformedRowPolicy::Skip => {
                        warn!(row, category, %reason, "skipping malformed skill record");
                        report.rejected.push(RejectedRow { row, category: category.to_string(), reason });
                    }
                },
            }
        }

        report.loaded = records.len();
        info!(loaded = report.loaded, rejected = report.rejected.len(), "skill records loaded");
        Ok((Self { records }, report))
    }

    fn decode_row(category: &str, raw: &str) -> std::result::Result<SkillRecord, String> {
        if category.trim().is_empty() {
            return Err("empty category".to_string());
        }
        let skills = parse_skill_mapping(raw).map_err(|e| e.to_string())?;
        Ok(SkillRecord::new(category, skills))
    }

    /// Exact-match lookup, first match wins
    pub fn get_by_category(&self, category: &str) -> Result<&SkillRecord> {
        self.records
            .iter()
            .find(|r| r.category == category)
            .ok_or_else(|| SkillMatchError::CategoryNotFound(category.to_string()))
    }

    /// All records in load order
    pub fn all(&self) -> &[SkillRecord] {
        &self.records
    }

    /// Category names in load order, duplicates included
    pub fn categories(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.category.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
