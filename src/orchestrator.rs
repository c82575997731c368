use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::classify::TierGroups;
use crate::error::PipelineError;
use crate::extract::{extract_ideas, RetryPolicy, Sleeper};
use crate::fetch::TopicSource;
use crate::llm::TextGenerator;
use crate::models::{IdeaRecord, Tier, TopicRecord};
use crate::render::{render_report, ReportMeta};

pub const REPORT_PREFIX: &str = "weibo-hot-analysis";

/// Per-run job parameters.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub top_n: usize,
    pub report_dir: PathBuf,
    pub retry: RetryPolicy,
    pub github_output: Option<PathBuf>,
}

/// Wall-clock instant the run is stamped with.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    pub utc: DateTime<Utc>,
}

impl RunClock {
    pub fn now() -> Self {
        Self { utc: Utc::now() }
    }

    /// `YYYYMMDDHHMMSS` in UTC, used in the file name.
    pub fn compact(&self) -> String {
        self.utc.format("%Y%m%d%H%M%S").to_string()
    }

    /// Human-readable report time in China Standard Time.
    pub fn display(&self) -> String {
        self.utc.with_timezone(&Shanghai).format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub product_name: String,
    pub total: Option<u32>,
    pub preview: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub report_name: String,
    pub excellent: usize,
    pub good: usize,
    pub normal: usize,
    pub highlights: Vec<Highlight>,
}

/// Hook for future topic-quality filtering (e.g. dropping pure gossip).
/// Currently only caps the candidate pool at `2 * n`.
pub fn shortlist_candidates(topics: Vec<TopicRecord>, n: usize) -> Vec<TopicRecord> {
    let mut topics = topics;
    topics.truncate(n.saturating_mul(2));
    topics
}

pub fn select_topics(topics: Vec<TopicRecord>, n: usize) -> Vec<TopicRecord> {
    let mut selected = shortlist_candidates(topics, n);
    selected.truncate(n);
    selected
}

pub fn report_name(clock: &RunClock) -> String {
    format!("{}-{}.html", REPORT_PREFIX, clock.compact())
}

fn highlights(ideas: &[IdeaRecord]) -> Vec<Highlight> {
    ideas
        .iter()
        .filter(|i| i.tier == Tier::Excellent)
        .map(|i| Highlight {
            product_name: i.product_name.clone(),
            total: i.scores.total,
            preview: i.core_function.chars().take(50).collect(),
        })
        .collect()
}

/// Write the whole report in one call, creating the directory if needed.
pub fn write_report(dir: &Path, name: &str, html: &str) -> Result<PathBuf, PipelineError> {
    std::fs::create_dir_all(dir).map_err(|source| PipelineError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(name);
    std::fs::write(&path, html.as_bytes()).map_err(|source| PipelineError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(std::path::absolute(&path).unwrap_or(path))
}

/// Append `report_path=` and `report_name=` lines to the automation output file.
pub fn publish_outputs(
    output_file: &Path,
    report_path: &Path,
    report_name: &str,
) -> Result<(), PipelineError> {
    let to_err = |source: std::io::Error| PipelineError::Write {
        path: output_file.to_path_buf(),
        source,
    };

    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_file)
        .map_err(to_err)?;

    writeln!(f, "report_path={}", report_path.display()).map_err(to_err)?;
    writeln!(f, "report_name={}", report_name).map_err(to_err)?;
    Ok(())
}

pub async fn run_report<T, G, S>(
    source: &T,
    generator: &G,
    sleeper: &S,
    job: &JobSettings,
    clock: RunClock,
) -> Result<RunSummary, PipelineError>
where
    T: TopicSource + Sync + ?Sized,
    G: TextGenerator + Sync + ?Sized,
    S: Sleeper + Sync + ?Sized,
{
    let pipeline_start = std::time::Instant::now();
    info!("Pipeline started - top_n={}, model={}", job.top_n, generator.model());

    // 1) fetch
    let topics = source.fetch_topics().await?;
    let fetched = topics.len();

    // 2) select
    let selected = select_topics(topics, job.top_n);
    info!("Selected {} of {} topics for analysis", selected.len(), fetched);
    for (i, t) in selected.iter().enumerate() {
        info!("  {}. {}", i + 1, t.name);
    }

    // 3) extract + classify
    let extract_start = std::time::Instant::now();
    let ideas = extract_ideas(generator, sleeper, &selected, job.retry).await?;
    let groups = TierGroups::group(&ideas);
    let (excellent, good, normal) = (
        groups.count(Tier::Excellent),
        groups.count(Tier::Good),
        groups.count(Tier::Normal),
    );
    info!(
        "Extraction completed - duration={:.2}s, ideas={}, excellent={}, good={}, normal={}",
        extract_start.elapsed().as_secs_f32(),
        ideas.len(),
        excellent,
        good,
        normal
    );

    // 4) render
    let meta = ReportMeta {
        generated_at: clock.display(),
        model: generator.model().to_string(),
        topic_count: selected.len(),
    };
    let html = render_report(&groups, &meta);

    // 5) persist
    let name = report_name(&clock);
    let report_path = write_report(&job.report_dir, &name, &html)?;
    info!("Report written - path={}, bytes={}", report_path.display(), html.len());

    // the report is already on disk; a broken output file must not fail the run
    if let Some(out) = &job.github_output {
        match publish_outputs(out, &report_path, &name) {
            Ok(()) => debug!("Appended report outputs to {}", out.display()),
            Err(e) => warn!("Could not publish report outputs: {}", e),
        }
    }

    let highlights = highlights(&ideas);
    if !highlights.is_empty() {
        info!("Recommended excellent ideas:");
        for h in &highlights {
            info!(
                "  - {} ({} pts): {}...",
                h.product_name,
                h.total.map_or_else(|| "?".to_string(), |t| t.to_string()),
                h.preview
            );
        }
    }

    info!(
        "Pipeline completed successfully - total_duration={:.2}s",
        pipeline_start.elapsed().as_secs_f32()
    );

    Ok(RunSummary {
        report_path,
        report_name: name,
        excellent,
        good,
        normal,
        highlights,
    })
}
