pub mod aggregate;
pub mod config;
pub mod evaluate;
pub mod incidence;
pub mod skill;
pub mod store;

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::{
    error::{Result, SkillMatchError},
    matcher::{
        aggregate::{aggregate_frequency, all_skill_names, top_k, SkillUniverse},
        config::MatcherConfig,
        evaluate::scoring::{match_jobs, JobMatches},
        incidence::IncidenceMatrix,
        skill::SkillFrequency,
        store::{LoadReport, SkillRecordStore},
    },
};

/// Application-scoped matcher over one loaded dataset.
///
/// Derived structures (universe, aggregate frequency, incidence table) are
/// computed on first use and then shared read-only. `reload` swaps the
/// dataset and drops them; nothing else mutates the matcher, so a `&SkillMatcher`
/// can serve concurrent queries.
#[derive(Debug)]
pub struct SkillMatcher {
    config: MatcherConfig,
    store: Arc<SkillRecordStore>,
    load_report: LoadReport,
    /// bumped on every reload
    generation: u64,
    universe: OnceLock<Arc<SkillUniverse>>,
    frequency: OnceLock<SkillFrequency>,
    matrix: OnceLock<IncidenceMatrix>,
}

impl SkillMatcher {
    /// Decode raw `(category, skills literal)` rows and build a matcher
    pub fn load<I, C, S>(rows: I, config: MatcherConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        config.validate()?;
        let (store, load_report) = SkillRecordStore::load(rows, config.malformed_rows)?;
        Ok(Self::with_report(store, load_report, config))
    }

    /// Build a matcher over an existing store
    pub fn from_store(store: SkillRecordStore, config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let load_report = LoadReport { loaded: store.len(), rejected: Vec::new() };
        Ok(Self::with_report(store, load_report, config))
    }

    fn with_report(store: SkillRecordStore, load_report: LoadReport, config: MatcherConfig) -> Self {
        Self {
            config,
            store: Arc::new(store),
            load_report,
            generation: 0,
            universe: OnceLock::new(),
            frequency: OnceLock::new(),
            matrix: OnceLock::new(),
        }
    }

    /// Replace the dataset and invalidate every derived structure
    /// On error the current dataset stays in place.
    pub fn reload<I, C, S>(&mut self, rows: I) -> Result<&LoadReport>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let (store, load_report) = SkillRecordStore::load(rows, self.config.malformed_rows)?;
        self.store = Arc::new(store);
        self.load_report = load_report;
        self.generation += 1;
        self.universe = OnceLock::new();
        self.frequency = OnceLock::new();
        self.matrix = OnceLock::new();
        info!(generation = self.generation, records = self.store.len(), "dataset reloaded");
        Ok(&self.load_report)
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn store(&self) -> &SkillRecordStore {
        &self.store
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 遅延計算されるキャッシュ
impl SkillMatcher {
    /// Every distinct skill, sorted by name
    pub fn universe(&self) -> &SkillUniverse {
        self.universe_arc()
    }

    fn universe_arc(&self) -> &Arc<SkillUniverse> {
        self.universe.get_or_init(|| {
            let universe = all_skill_names(&self.store);
            debug!(generation = self.generation, skills = universe.len(), "skill universe built");
            Arc::new(universe)
        })
    }

    /// Skill → total count over all categories, keyed in name order
    pub fn all_skill_frequencies(&self) -> &SkillFrequency {
        self.frequency.get_or_init(|| {
            let frequency = aggregate_frequency(&self.store);
            debug!(generation = self.generation, skills = frequency.skill_num(), "aggregate frequency built");
            frequency
        })
    }

    /// Job × skill incidence table, one row per record
    pub fn incidence_matrix(&self) -> Result<&IncidenceMatrix> {
        if let Some(matrix) = self.matrix.get() {
            return Ok(matrix);
        }
        let matrix = IncidenceMatrix::build(Arc::clone(self.universe_arc()), &self.store)?;
        debug!(
            generation = self.generation,
            rows = matrix.row_num(),
            columns = matrix.column_num(),
            "incidence matrix built"
        );
        // 別スレッドが先に入れていたらそちらを使う
        Ok(self.matrix.get_or_init(|| matrix))
    }
}

/// Queries
impl SkillMatcher {
    /// Category names in load order, for selection widgets
    pub fn list_categories(&self) -> Vec<&str> {
        self.store.categories()
    }

    /// Skill names in universe order, for selection widgets
    pub fn list_all_skill_names(&self) -> Vec<&str> {
        self.universe().names()
    }

    /// The skill mapping of a category (first match wins)
    pub fn category_frequencies(&self, category: &str) -> Result<&SkillFrequency> {
        Ok(&self.store.get_by_category(category)?.skills)
    }

    /// Top `k` skills of a category
    pub fn top_category_skills(&self, category: &str, k: usize) -> Result<Vec<(String, u64)>> {
        top_k(self.category_frequencies(category)?, k)
    }

    /// `top_category_skills` with `default_top_skills`
    pub fn top_category_skills_default(&self, category: &str) -> Result<Vec<(String, u64)>> {
        self.top_category_skills(category, self.config.default_top_skills)
    }

    /// The aggregate frequency truncated to the `limit` most frequent skills
    pub fn frequency_view(&self, limit: usize) -> Result<Vec<(String, u64)>> {
        top_k(self.all_skill_frequencies(), limit)
    }

    /// `frequency_view` with `frequency_view_limit`
    pub fn frequency_view_default(&self) -> Vec<(String, u64)> {
        self.all_skill_frequencies()
            .top_frequency_vector(self.config.frequency_view_limit)
    }

    /// Jobs ranked by overlap with `selected`, zero scores included
    pub fn rank_jobs_by_skills<S>(&self, selected: &[S], top_n: usize) -> Result<JobMatches>
    where
        S: AsRef<str>,
    {
        if selected.is_empty() {
            return Err(SkillMatchError::InvalidArgument("skill selection must not be empty".to_string()));
        }
        match_jobs(self.incidence_matrix()?, selected, top_n)
    }

    /// `rank_jobs_by_skills` with `default_top_jobs`
    pub fn rank_jobs_by_skills_default<S>(&self, selected: &[S]) -> Result<JobMatches>
    where
        S: AsRef<str>,
    {
        self.rank_jobs_by_skills(selected, self.config.default_top_jobs)
    }
}
