//! Idea extraction: prompt the text generator, pull a JSON array out of its
//! free-form reply, retry with linear backoff.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::api_types::MessagesResponse;
use crate::classify::classify;
use crate::error::{AttemptError, PipelineError};
use crate::llm::TextGenerator;
use crate::models::{IdeaDraft, IdeaRecord, TopicRecord};
use crate::prompts::idea_prompt;

/// Delay between attempts. Injected so retries are testable without wall-clock waits.
#[async_trait]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay after attempt `n` is `n * backoff_step`.
    pub backoff_step: Duration,
    pub max_tokens: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(5000),
            max_tokens: 8000,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Which strategy located the JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSource {
    FencedBlock,
    BracketSpan,
    WholeText,
}

type Candidate = fn(&str) -> Option<&str>;

const STRATEGIES: [(JsonSource, Candidate); 3] = [
    (JsonSource::FencedBlock, fenced_block as Candidate),
    (JsonSource::BracketSpan, bracket_span as Candidate),
    (JsonSource::WholeText, whole_text as Candidate),
];

fn fenced_block(text: &str) -> Option<&str> {
    static FENCE_RE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE_RE
        .get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid regex"));
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

fn bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn whole_text(text: &str) -> Option<&str> {
    Some(text.trim())
}

/// Try each strategy in order; the first candidate that parses as an array of ideas wins.
pub fn parse_idea_array(text: &str) -> Option<(JsonSource, Vec<IdeaDraft>)> {
    STRATEGIES.iter().find_map(|(source, candidate)| {
        let slice = candidate(text)?;
        match serde_json::from_str::<Vec<IdeaDraft>>(slice) {
            Ok(drafts) => Some((*source, drafts)),
            Err(e) => {
                debug!("JSON parse via {:?} failed: {}", source, e);
                None
            }
        }
    })
}

/// Pull the response text out of the first content block, rejecting empty or non-text replies.
pub fn response_text(resp: &MessagesResponse) -> Result<&str, AttemptError> {
    let first = resp.content.first().ok_or(AttemptError::EmptyContent)?;
    if first.kind != "text" {
        return Err(AttemptError::NonTextContent(first.kind.clone()));
    }
    if first.text.is_empty() {
        return Err(AttemptError::EmptyText);
    }
    Ok(&first.text)
}

fn head_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn tail_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}

async fn attempt_once<G>(
    generator: &G,
    prompt: &str,
    max_tokens: u32,
) -> Result<Vec<IdeaDraft>, AttemptError>
where
    G: TextGenerator + Sync + ?Sized,
{
    let resp = generator.generate(prompt, max_tokens).await?;

    info!(
        "API response - stop_reason={}, content_blocks={}, usage={}",
        resp.stop_reason.as_deref().unwrap_or("none"),
        resp.content.len(),
        serde_json::to_string(&resp.usage).unwrap_or_default()
    );

    let text = response_text(&resp)?;
    debug!("Received response - length={} chars", text.chars().count());

    match parse_idea_array(text) {
        Some((source, drafts)) => {
            debug!("Extracted JSON array via {:?}", source);
            Ok(drafts)
        }
        None => {
            debug!("Response head (1000 chars): {}", head_chars(text, 1000));
            debug!("Response tail (500 chars): {}", tail_chars(text, 500));
            Err(AttemptError::UnparseableJson)
        }
    }
}

/// Ask the generator for one idea per topic and return them tiered, in reply order.
pub async fn extract_ideas<G, S>(
    generator: &G,
    sleeper: &S,
    topics: &[TopicRecord],
    policy: RetryPolicy,
) -> Result<Vec<IdeaRecord>, PipelineError>
where
    G: TextGenerator + Sync + ?Sized,
    S: Sleeper + Sync + ?Sized,
{
    let prompt = idea_prompt(topics);
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error: Option<AttemptError> = None;

    info!(
        "Idea extraction starting - topics={}, model={}, max_attempts={}",
        topics.len(),
        generator.model(),
        max_attempts
    );

    for attempt in 1..=max_attempts {
        info!("API call attempt {}/{}", attempt, max_attempts);

        match attempt_once(generator, &prompt, policy.max_tokens).await {
            Ok(drafts) => {
                for d in drafts.iter().filter(|d| !d.scores.is_consistent()) {
                    warn!(
                        "Score total mismatch - topic={}, total={:?}, sum={}",
                        d.topic,
                        d.scores.total,
                        d.scores.component_sum()
                    );
                }
                info!("Parsed {} product ideas", drafts.len());
                return Ok(classify(drafts));
            }
            Err(e) => {
                warn!("Attempt {} failed: {}", attempt, e);
                last_error = Some(e);
                if attempt < max_attempts {
                    let wait = policy.delay_after(attempt);
                    info!("Retrying in {}s", wait.as_secs());
                    sleeper.sleep(wait).await;
                }
            }
        }
    }

    error!("Idea extraction failed - all {} attempts exhausted", max_attempts);
    Err(PipelineError::Extraction {
        attempts: max_attempts,
        message: last_error.map_or_else(|| "unknown error".to_string(), |e| e.to_string()),
    })
}
