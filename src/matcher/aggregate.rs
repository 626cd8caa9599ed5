use std::collections::BTreeSet;

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SkillMatchError},
    matcher::{skill::SkillFrequency, store::SkillRecordStore},
};

/// Ordered set of every distinct skill in a dataset.
/// Position in the set is the column index of the incidence table.
/// Names are kept in lexicographic (byte) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUniverse {
    skills: IndexSet<String>,
}

impl SkillUniverse {
    /// Build a universe from arbitrary names (deduplicated, sorted)
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self { skills: sorted.into_iter().collect() }
    }

    /// Column of a skill, O(1)
    #[inline]
    pub fn index_of(&self, skill: &str) -> Option<usize> {
        self.skills.get_index_of(skill)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.skills.get_index(index).map(|s| s.as_str())
    }

    #[inline]
    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.skills.iter().map(|s| s.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().collect()
    }
}

/// Every distinct skill name across the store
/// The result is identical for repeated calls on the same store.
pub fn all_skill_names(store: &SkillRecordStore) -> SkillUniverse {
    SkillUniverse::from_names(
        store
            .all()
            .iter()
            .flat_map(|record| record.skills.iter().map(|(skill, _)| skill)),
    )
}

/// Sum each skill's count over all records
/// Records are folded in parallel; the result is keyed in skill-name order,
/// so neither totals nor iteration order depend on record order.
pub fn aggregate_frequency(store: &SkillRecordStore) -> SkillFrequency {
    let mut total = store
        .all()
        .par_iter()
        .fold(SkillFrequency::new, |mut acc, record| {
            acc.add_skills_from_freq(&record.skills);
            acc
        })
        .reduce(SkillFrequency::new, |mut a, b| {
            a.add_skills_from_freq(&b);
            a
        });
    total.sort_by_skill_name();
    total
}

/// Top `k` skills by count
/// Ties are broken by skill name (ascending).
///
/// # Arguments
/// * `freq` - per-category or aggregate table
/// * `k` - number of entries, must be > 0
///
/// # Returns
/// * `min(k, distinct skills)` pairs, non-increasing by count
pub fn top_k(freq: &SkillFrequency, k: usize) -> Result<Vec<(String, u64)>> {
    if k == 0 {
        return Err(SkillMatchError::InvalidArgument("k must be greater than 0".to_string()));
    }
    Ok(freq.top_frequency_vector(k))
}
