use std::sync::Arc;

use num::Num;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SkillMatchError},
    matcher::{aggregate::SkillUniverse, store::SkillRecordStore},
};

/// Presence vector of one job
/// `vector[i]` is one when the job lists universe skill `i`, zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidenceRow<N = u8>
where
    N: Num + Copy,
{
    pub job: String,
    pub vector: Vec<N>,
}

impl<N> IncidenceRow<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn has(&self, column: usize) -> bool {
        self.vector.get(column).is_some_and(|v| !v.is_zero())
    }

    /// Number of set columns
    pub fn skill_num(&self) -> usize {
        self.vector.iter().filter(|v| !v.is_zero()).count()
    }
}

/// Job × skill incidence table with the universe that fixes its columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceMatrix<N = u8>
where
    N: Num + Copy,
{
    universe: Arc<SkillUniverse>,
    rows: Vec<IncidenceRow<N>>,
}

impl<N> IncidenceMatrix<N>
where
    N: Num + Copy,
{
    /// Build one row per record, in store order
    /// A record skill with count 0 leaves its column unset.
    ///
    /// # Arguments
    /// * `universe` - column order; must cover every skill in `store`
    /// * `store` - records to encode
    ///
    /// # Errors
    /// * `UnknownSkill` when a record skill is missing from `universe`
    pub fn build(universe: Arc<SkillUniverse>, store: &SkillRecordStore) -> Result<Self> {
        let width = universe.len();
        let rows = store
            .all()
            .iter()
            .map(|record| {
                let mut vector = vec![N::zero(); width];
                for (skill, count) in record.skills.iter() {
                    let column = universe.index_of(skill).ok_or_else(|| SkillMatchError::UnknownSkill {
                        skill: skill.to_string(),
                        job: Some(record.category.clone()),
                    })?;
                    if count > 0 {
                        vector[column] = N::one();
                    }
                }
                Ok(IncidenceRow { job: record.category.clone(), vector })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { universe, rows })
    }

    pub fn universe(&self) -> &SkillUniverse {
        &self.universe
    }

    pub fn rows(&self) -> &[IncidenceRow<N>] {
        &self.rows
    }

    /// Cell value, `None` when out of range
    pub fn get(&self, row: usize, skill: &str) -> Option<N> {
        let column = self.universe.index_of(skill)?;
        self.rows.get(row)?.vector.get(column).copied()
    }

    pub fn row_num(&self) -> usize {
        self.rows.len()
    }

    pub fn column_num(&self) -> usize {
        self.universe.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{
        aggregate::all_skill_names,
        config::MalformedRowPolicy,
        skill::SkillFrequency,
        store::SkillRecord,
    };

    fn load(rows: Vec<(&str, &str)>) -> SkillRecordStore {
        SkillRecordStore::load(rows, MalformedRowPolicy::Abort).unwrap().0
    }

    #[test]
    fn rows_mark_present_skills_only() {
        let store = load(vec![("Eng", "{'A': 3, 'B': 1}"), ("Ops", "{'C': 2}")]);
        let universe = Arc::new(all_skill_names(&store));
        let matrix: IncidenceMatrix = IncidenceMatrix::build(universe, &store).unwrap();
        assert_eq!(matrix.row_num(), 2);
        assert_eq!(matrix.column_num(), 3);
        assert_eq!(matrix.rows()[0].job, "Eng");
        assert_eq!(matrix.rows()[0].vector, vec![1, 1, 0]);
        assert_eq!(matrix.rows()[1].vector, vec![0, 0, 1]);
        assert_eq!(matrix.get(1, "C"), Some(1));
        assert_eq!(matrix.get(1, "Z"), None);
    }

    #[test]
    fn magnitude_is_discarded() {
        let store = load(vec![("Big", "{'A': 100}"), ("Small", "{'A': 1}")]);
        let matrix: IncidenceMatrix = IncidenceMatrix::build(Arc::new(all_skill_names(&store)), &store).unwrap();
        assert_eq!(matrix.rows()[0].vector, matrix.rows()[1].vector);
        assert!(matrix.rows()[0].has(0));
    }

    #[test]
    fn zero_count_leaves_column_unset() {
        let store = load(vec![("Eng", "{'A': 1, 'B': 0}")]);
        let matrix: IncidenceMatrix = IncidenceMatrix::build(Arc::new(all_skill_names(&store)), &store).unwrap();
        assert_eq!(matrix.rows()[0].vector, vec![1, 0]);
        assert_eq!(matrix.rows()[0].skill_num(), 1);
    }

    #[test]
    fn foreign_universe_is_rejected() {
        let store = SkillRecordStore::from_records(vec![SkillRecord::new(
            "Eng",
            [("rust", 2u64)].into_iter().collect::<SkillFrequency>(),
        )]);
        let universe = Arc::new(SkillUniverse::from_names(["python"]));
        let err = IncidenceMatrix::<u8>::build(universe, &store).unwrap_err();
        assert_eq!(
            err,
            SkillMatchError::UnknownSkill { skill: "rust".to_string(), job: Some("Eng".to_string()) }
        );
    }

    #[test]
    fn works_with_wider_cells() {
        let store = load(vec![("Eng", "{'A': 1}")]);
        let matrix = IncidenceMatrix::<f32>::build(Arc::new(all_skill_names(&store)), &store).unwrap();
        assert_eq!(matrix.rows()[0].vector, vec![1.0f32]);
    }
}
