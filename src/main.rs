mod api_types;
mod classify;
mod config;
mod error;
mod extract;
mod fetch;
mod llm;
mod models;
mod orchestrator;
mod prompts;
mod render;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use config::{parse_top_n, Settings};
use extract::{RetryPolicy, TokioSleeper};
use fetch::TianApiSource;
use llm::AnthropicClient;
use orchestrator::{report_name, run_report, JobSettings, RunClock};

const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Trend Ideas - trending-topic product idea report generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of topics to analyze, as `top<N>` (default: top10)
    selection: Option<String>,

    /// Output directory for generated reports
    #[arg(short, long, default_value = "reports")]
    report_dir: PathBuf,

    /// Maximum number of generation attempts
    #[arg(long, default_value_t = 3)]
    max_retries: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    let top_n = parse_top_n(args.selection.as_deref());

    // Credentials are checked before any network traffic
    let settings = Settings::from_env()?;
    debug!("Resolved settings: {:?}", settings);

    let clock = RunClock::now();
    let report_dir = std::path::absolute(&args.report_dir).unwrap_or(args.report_dir);

    info!("Starting trend_ideas");
    info!(
        "Run parameters - selection=top{}, api_base={}, model={}, report={}, report_time={}",
        top_n,
        settings.api_base_url,
        settings.model,
        report_dir.join(report_name(&clock)).display(),
        clock.display()
    );

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let source = TianApiSource::new(http, settings.topic_api_key.clone());
    let generator = AnthropicClient::new(&settings, HTTP_TIMEOUT)?;

    let job = JobSettings {
        top_n,
        report_dir,
        retry: RetryPolicy::with_max_attempts(args.max_retries),
        github_output: settings.github_output.clone(),
    };

    let summary = run_report(&source, &generator, &TokioSleeper, &job, clock).await?;

    info!(
        "Analysis complete - report={}, path={}, excellent={}, good={}, normal={}",
        summary.report_name,
        summary.report_path.display(),
        summary.excellent,
        summary.good,
        summary.normal
    );
    Ok(())
}
