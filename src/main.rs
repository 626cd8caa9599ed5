use std::{fs, path::PathBuf, time::Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use job_skill_matcher::{MalformedRowPolicy, MatcherConfig, SkillMatcher};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Print skill rankings and job matches for a `category,skills` CSV file
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// CSV with a `category` and a `skills` column
    data: PathBuf,

    /// Category to chart (defaults to the first one)
    #[arg(short, long)]
    category: Option<String>,

    /// Skills to match jobs against, comma separated
    #[arg(short, long, value_delimiter = ',')]
    skills: Vec<String>,

    /// Skills shown for the category
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=10))]
    top_skills: u64,

    /// Jobs shown for the selection
    #[arg(long, default_value_t = 5)]
    top_jobs: usize,

    /// Fail on the first malformed row instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let text = fs::read_to_string(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    let rows = read_rows(&text)?;

    let config = MatcherConfig {
        default_top_jobs: args.top_jobs,
        malformed_rows: if args.strict { MalformedRowPolicy::Abort } else { MalformedRowPolicy::Skip },
        ..Default::default()
    };
    let start = Instant::now();
    let matcher = SkillMatcher::load(rows, config)?;
    info!(elapsed = ?start.elapsed(), records = matcher.store().len(), "dataset ready");

    let Some(category) = args
        .category
        .clone()
        .or_else(|| matcher.list_categories().first().map(|c| c.to_string()))
    else {
        bail!("dataset has no usable rows");
    };

    println!("Top skills for {category}:");
    for (skill, count) in matcher.top_category_skills(&category, args.top_skills as usize)? {
        println!("  {skill:<32} {count}");
    }

    println!("\nMost frequent skills overall:");
    for (skill, count) in matcher.frequency_view_default() {
        println!("  {skill:<32} {count}");
    }

    if !args.skills.is_empty() {
        let matches = matcher.rank_jobs_by_skills_default(&args.skills)?.matched();
        println!("\nTop jobs for selected skills:");
        if matches.is_empty() {
            println!("  (no matching jobs)");
        } else {
            print!("{matches}");
        }
    }
    Ok(())
}

/// One data row; columns are matched by header name
#[derive(Debug, Deserialize)]
struct Row {
    category: String,
    skills: String,
}

// ヘッダ付き CSV を (category, skills) の組に分解
fn read_rows(text: &str) -> Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    reader
        .deserialize::<Row>()
        .enumerate()
        .map(|(line, row)| -> Result<(String, String)> {
            let row = row.with_context(|| format!("failed to decode record {}", line + 1))?;
            Ok((row.category, row.skills))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_quoted_skill_column() {
        let text = "category,skills\nEng,\"{'python': 5, 'sql': 2}\"\r\n\nData,\"{\"\"sql\"\": 4}\"\n";
        let rows = read_rows(text).unwrap();
        assert_eq!(
            rows,
            vec![
                ("Eng".to_string(), "{'python': 5, 'sql': 2}".to_string()),
                ("Data".to_string(), "{\"sql\": 4}".to_string()),
            ]
        );
    }

    #[test]
    fn column_order_comes_from_header() {
        let rows = read_rows("skills,category\n\"{'a': 1}\",Ops").unwrap();
        assert_eq!(rows, vec![("Ops".to_string(), "{'a': 1}".to_string())]);
    }

    #[test]
    fn missing_column_is_an_error() {
        assert!(read_rows("category,other\nEng,x\n").is_err());
    }

    #[test]
    fn quoted_field_may_span_lines_and_extra_columns_are_ignored() {
        let text = "id, category ,skills\n1,Ops,\"{'bash': 1,\n 'sql': 2}\"\n";
        let rows = read_rows(text).unwrap();
        assert_eq!(rows, vec![("Ops".to_string(), "{'bash': 1,\n 'sql': 2}".to_string())]);
    }

    #[test]
    fn escaped_keys_reach_the_matcher_intact() {
        let rows = read_rows("category,skills\nEng,\"{'Excel\\xa0': 2, 'sql': 1}\"\n").unwrap();
        let matcher = SkillMatcher::load(rows, MatcherConfig::default()).unwrap();
        assert!(matcher.load_report().is_clean());
        assert_eq!(matcher.list_all_skill_names(), vec!["Excel\u{a0}", "sql"]);
    }
}
