use std::fmt::{Debug, Display};

use indexmap::IndexSet;
use num::Num;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SkillMatchError},
    matcher::incidence::IncidenceMatrix,
    utils::sort::{rank_order, top_n_by},
};

/// Score of one job for a skill selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub job: String,
    /// selected skills present in the job
    pub score: u64,
}

/// Structure to store ranked match results
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobMatches {
    /// score descending, then row order
    pub list: Vec<MatchScore>,
}

impl JobMatches {
    pub fn new(list: Vec<MatchScore>) -> Self {
        JobMatches { list }
    }

    /// Drop zero-score entries (a zero score means "no match")
    pub fn matched(mut self) -> Self {
        self.list.retain(|m| m.score > 0);
        self
    }

    pub fn jobs(&self) -> Vec<&str> {
        self.list.iter().map(|m| m.job.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchScore> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl IntoIterator for JobMatches {
    type Item = MatchScore;
    type IntoIter = std::vec::IntoIter<MatchScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl Debug for JobMatches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "JobMatches [")?;
            for m in &self.list {
                writeln!(f, "    {:?}: {}", m.job, m.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for JobMatches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (rank, m) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {} ({})", rank + 1, m.job, m.score)?;
        }
        Ok(())
    }
}

/// Rank jobs by how many selected skills they have
///
/// Selection is treated as a set; repeated names count once.
/// Zero-score jobs are kept so the caller can tell "ranked last" from
/// "not ranked"; use `JobMatches::matched` before display.
///
/// # Arguments
/// * `matrix` - incidence table to score
/// * `selected` - skill names, non-empty, each in the matrix universe
/// * `top_n` - result length bound, must be > 0
///
/// # Errors
/// * `InvalidArgument` for an empty selection or `top_n == 0`
/// * `UnknownSkill` for a selected name outside the universe
pub fn match_jobs<N, S>(matrix: &IncidenceMatrix<N>, selected: &[S], top_n: usize) -> Result<JobMatches>
where
    N: Num + Copy + Send + Sync,
    S: AsRef<str>,
{
    if selected.is_empty() {
        return Err(SkillMatchError::InvalidArgument("skill selection must not be empty".to_string()));
    }
    if top_n == 0 {
        return Err(SkillMatchError::InvalidArgument("top_n must be greater than 0".to_string()));
    }

    let universe = matrix.universe();
    let columns: IndexSet<usize> = selected
        .iter()
        .map(|skill| {
            let skill = skill.as_ref();
            universe
                .index_of(skill)
                .ok_or_else(|| SkillMatchError::UnknownSkill { skill: skill.to_string(), job: None })
        })
        .collect::<Result<_>>()?;

    // (row index, score)
    let scored: Vec<(usize, u64)> = matrix
        .rows()
        .par_iter()
        .enumerate()
        .map(|(idx, row)| {
            let score = columns.iter().filter(|&&col| row.has(col)).count() as u64;
            (idx, score)
        })
        .collect();

    let ranked = top_n_by(scored, top_n, |a, b| rank_order((a.1, &a.0), (b.1, &b.0)));
    let rows = matrix.rows();
    Ok(JobMatches::new(
        ranked
            .into_iter()
            .map(|(idx, score)| MatchScore { job: rows[idx].job.clone(), score })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::matcher::{
        aggregate::{all_skill_names, SkillUniverse},
        config::MalformedRowPolicy,
        store::SkillRecordStore,
    };

    fn matrix(rows: Vec<(&str, &str)>) -> IncidenceMatrix {
        let store = SkillRecordStore::load(rows, MalformedRowPolicy::Abort).unwrap().0;
        IncidenceMatrix::build(Arc::new(all_skill_names(&store)), &store).unwrap()
    }

    fn score(job: &str, score: u64) -> MatchScore {
        MatchScore { job: job.to_string(), score }
    }

    #[test]
    fn present_skill_outranks_absent() {
        let m = matrix(vec![("Job1", "{'A': 1, 'B': 0}"), ("Job2", "{'A': 0, 'B': 1}")]);
        let result = match_jobs(&m, &["A"], 5).unwrap();
        assert_eq!(result.list, vec![score("Job1", 1), score("Job2", 0)]);
        assert_eq!(result.matched().jobs(), vec!["Job1"]);
    }

    #[test]
    fn equal_scores_keep_row_order() {
        let m = matrix(vec![("Eng", "{'python': 5, 'sql': 2}"), ("Data", "{'sql': 4, 'python': 1}")]);
        let result = match_jobs(&m, &["sql"], 5).unwrap();
        assert_eq!(result.list, vec![score("Eng", 1), score("Data", 1)]);
    }

    #[test]
    fn ranks_by_overlap_and_truncates() {
        let m = matrix(vec![
            ("One", "{'a': 1}"),
            ("Three", "{'a': 1, 'b': 1, 'c': 1}"),
            ("None", "{'z': 4}"),
            ("Two", "{'b': 2, 'c': 9}"),
        ]);
        let result = match_jobs(&m, &["a", "b", "c"], 2).unwrap();
        assert_eq!(result.list, vec![score("Three", 3), score("Two", 2)]);

        let all = match_jobs(&m, &["a", "b", "c"], 10).unwrap();
        assert_eq!(all.jobs(), vec!["Three", "Two", "One", "None"]);
        assert_eq!(all.matched().len(), 3);
    }

    #[test]
    fn repeated_selection_counts_once() {
        let m = matrix(vec![("One", "{'a': 1}")]);
        let result = match_jobs(&m, &["a", "a"], 5).unwrap();
        assert_eq!(result.list, vec![score("One", 1)]);
    }

    #[test]
    fn rejects_bad_arguments() {
        let m = matrix(vec![("One", "{'a': 1}")]);
        let empty: [&str; 0] = [];
        assert!(matches!(match_jobs(&m, &empty, 5), Err(SkillMatchError::InvalidArgument(_))));
        assert!(matches!(match_jobs(&m, &["a"], 0), Err(SkillMatchError::InvalidArgument(_))));
        assert_eq!(
            match_jobs(&m, &["rust"], 5).unwrap_err(),
            SkillMatchError::UnknownSkill { skill: "rust".to_string(), job: None }
        );
    }

    #[test]
    fn empty_matrix_yields_empty_result() {
        let store = SkillRecordStore::default();
        let m: IncidenceMatrix =
            IncidenceMatrix::build(Arc::new(SkillUniverse::from_names(["a"])), &store).unwrap();
        assert!(match_jobs(&m, &["a"], 5).unwrap().is_empty());
    }

    #[test]
    fn alternate_debug_lists_one_job_per_line() {
        let matches = JobMatches::new(vec![score("Eng", 2)]);
        assert_eq!(format!("{:#?}", matches), "JobMatches [\n    \"Eng\": 2\n]");
        assert_eq!(matches.to_string(), "  1. Eng (2)\n");
    }
}
