use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::sort::{rank_order, top_n_by};

/// SkillFrequency 構造体
/// Skill name → occurrence count table.
/// Used both for a single record's skills and for the aggregate across a dataset.
///
/// Keeps insertion order, so iteration is reproducible for an unchanged table.
/// Equality ignores order.
///
/// # Examples
/// ```
/// use job_skill_matcher::SkillFrequency;
/// let mut freq = SkillFrequency::new();
/// freq.add_skill("python", 5);
/// freq.add_skill("sql", 2);
/// freq.add_skill("python", 1);
///
/// assert_eq!(freq.skill_count("python"), 6);
/// assert_eq!(freq.total_count(), 8);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    skill_count: IndexMap<String, u64>,
    total_count: u64,
}

/// 追加、マージの実装
impl SkillFrequency {
    pub fn new() -> Self {
        SkillFrequency {
            skill_count: IndexMap::new(),
            total_count: 0,
        }
    }

    /// Add `count` occurrences of a skill
    /// Unseen skills start at 0.
    ///
    /// # Arguments
    /// * `skill` - skill name
    /// * `count` - occurrences to add
    #[inline]
    pub fn add_skill(&mut self, skill: &str, count: u64) -> &mut Self {
        match self.skill_count.get_mut(skill) {
            Some(existing) => *existing = existing.saturating_add(count),
            None => {
                self.skill_count.insert(skill.to_string(), count);
            }
        }
        self.total_count = self.total_count.saturating_add(count);
        self
    }

    /// Add every entry of another table into this one
    ///
    /// # Arguments
    /// * `other` - table to merge in
    #[inline]
    pub fn add_skills_from_freq(&mut self, other: &SkillFrequency) -> &mut Self {
        for (skill, &count) in &other.skill_count {
            self.add_skill(skill, count);
        }
        self
    }

    /// Reorder entries by skill name (ascending)
    #[inline]
    pub fn sort_by_skill_name(&mut self) -> &mut Self {
        self.skill_count.sort_keys();
        self
    }
}

/// 情報取得の実装
impl SkillFrequency {
    /// Count of a skill, 0 if absent
    #[inline]
    pub fn skill_count(&self, skill: &str) -> u64 {
        self.skill_count.get(skill).copied().unwrap_or(0)
    }

    /// Sum of all counts
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of distinct skills
    #[inline]
    pub fn skill_num(&self) -> usize {
        self.skill_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.skill_count.is_empty()
    }

    #[inline]
    pub fn contains_skill(&self, skill: &str) -> bool {
        self.skill_count.contains_key(skill)
    }

    /// (skill, count) in table order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.skill_count.iter().map(|(skill, &count)| (skill.as_str(), count))
    }

    /// Skill names in table order
    #[inline]
    pub fn skill_set_ref_str(&self) -> Vec<&str> {
        self.skill_count.keys().map(|s| s.as_str()).collect()
    }

    /// Largest single count, 0 when empty
    #[inline]
    pub fn most_frequent_skill_count(&self) -> u64 {
        self.skill_count.values().copied().max().unwrap_or(0)
    }

    /// All (skill, count) pairs ranked by count (descending)
    /// Equal counts are ordered by skill name (ascending).
    ///
    /// # Returns
    /// * `Vec<(String, u64)>` - ranked pairs
    #[inline]
    pub fn sorted_frequency_vector(&self) -> Vec<(String, u64)> {
        self.top_frequency_vector(self.skill_count.len())
    }

    /// The first `n` pairs of `sorted_frequency_vector`
    /// Only the kept prefix is fully sorted.
    #[inline]
    pub fn top_frequency_vector(&self, n: usize) -> Vec<(String, u64)> {
        let list: Vec<(&str, u64)> = self.iter().collect();
        top_n_by(list, n, |a, b| rank_order((a.1, a.0), (b.1, b.0)))
            .into_iter()
            .map(|(skill, count)| (skill.to_string(), count))
            .collect()
    }
}

impl<S> FromIterator<(S, u64)> for SkillFrequency
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut freq = SkillFrequency::new();
        for (skill, count) in iter {
            freq.add_skill(skill.as_ref(), count);
        }
        freq
    }
}
