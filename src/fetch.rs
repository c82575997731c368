use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::TopicEnvelope;
use crate::error::PipelineError;
use crate::models::TopicRecord;

pub const TIANAPI_WEIBO_HOT_URL: &str = "https://apis.tianapi.com/weibohot/index";

/// Source of ranked trending topics.
#[async_trait]
pub trait TopicSource {
    async fn fetch_topics(&self) -> Result<Vec<TopicRecord>, PipelineError>;
}

pub struct TianApiSource {
    client: Client,
    endpoint: String,
    key: String,
}

impl TianApiSource {
    pub fn new(client: Client, key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: TIANAPI_WEIBO_HOT_URL.to_string(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl TopicSource for TianApiSource {
    async fn fetch_topics(&self) -> Result<Vec<TopicRecord>, PipelineError> {
        let start = std::time::Instant::now();
        debug!("Fetching trending topics - endpoint={}", self.endpoint);

        // errors are stripped of their URL: the query string carries the key
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.key.as_str())])
            .send()
            .await
            .map_err(|e| {
                PipelineError::Fetch(format!(
                    "request to {} failed: {}",
                    self.endpoint,
                    e.without_url()
                ))
            })?;

        let resp = resp
            .error_for_status()
            .map_err(|e| PipelineError::Fetch(format!("HTTP error: {}", e.without_url())))?;

        let envelope: TopicEnvelope = resp
            .json()
            .await
            .map_err(|e| {
                PipelineError::Fetch(format!("decoding topic list: {}", e.without_url()))
            })?;

        let topics = topics_from_envelope(envelope)?;

        info!(
            "Topic fetch completed - duration={:.2}s, topics={}",
            start.elapsed().as_secs_f32(),
            topics.len()
        );
        Ok(topics)
    }
}

/// Unwrap a decoded response into ranked topics, rejecting non-200 codes and missing lists.
pub fn topics_from_envelope(envelope: TopicEnvelope) -> Result<Vec<TopicRecord>, PipelineError> {
    if envelope.code != 200 {
        return Err(PipelineError::Fetch(format!(
            "API returned code {}: {}",
            envelope.code, envelope.msg
        )));
    }

    let list = envelope
        .result
        .and_then(|r| r.list)
        .ok_or_else(|| PipelineError::Fetch("response is missing result.list".into()))?;

    Ok(list
        .into_iter()
        .map(|item| TopicRecord {
            name: item.hotword.trim().to_string(),
            popularity: item.hotwordnum.trim().to_string(),
        })
        .collect())
}
