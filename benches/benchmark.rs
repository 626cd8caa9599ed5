use criterion::{black_box, criterion_group, criterion_main, Criterion};
use job_skill_matcher::{MatcherConfig, SkillMatcher};

/// Synthetic dataset: `jobs` categories drawing from `skills` skill names
fn generate_rows(jobs: usize, skills: usize) -> Vec<(String, String)> {
    (0..jobs)
        .map(|j| {
            let picked: std::collections::BTreeSet<usize> = (0..40).map(|k| (j * 7 + k * 13) % skills).collect();
            let entries: Vec<String> = picked
                .into_iter()
                .map(|s| format!("'skill{}': {}", s, (j + s) % 9 + 1))
                .collect();
            (format!("job{j}"), format!("{{{}}}", entries.join(", ")))
        })
        .collect()
}

fn build_and_match_benchmark(c: &mut Criterion) {
    let rows = generate_rows(2_000, 5_000);

    c.bench_function("load_and_build", |b| {
        b.iter(|| {
            let matcher = SkillMatcher::load(rows.iter().cloned(), MatcherConfig::default()).unwrap();
            black_box(matcher.incidence_matrix().unwrap().row_num())
        });
    });

    let matcher = SkillMatcher::load(rows.iter().cloned(), MatcherConfig::default()).unwrap();
    let selected: Vec<&str> = matcher.list_all_skill_names().into_iter().step_by(250).collect();
    matcher.incidence_matrix().unwrap();

    c.bench_function("rank_jobs", |b| {
        b.iter(|| matcher.rank_jobs_by_skills(black_box(&selected), 5).unwrap());
    });

    c.bench_function("aggregate_top_k", |b| {
        b.iter(|| job_skill_matcher::top_k(&job_skill_matcher::aggregate_frequency(matcher.store()), 50).unwrap());
    });
}

criterion_group!(benches, build_and_match_benchmark);
criterion_main!(benches);
