use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::api_types::{ChatMessage, MessagesRequest, MessagesResponse};
use crate::config::Settings;
use crate::error::AttemptError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A chat-completion style text generator.
#[async_trait]
pub trait TextGenerator {
    fn model(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<MessagesResponse, AttemptError>;
}

/// Messages API client pointed at the configured base URL.
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(settings: &Settings, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", HeaderValue::from_str(&settings.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<MessagesResponse, AttemptError> {
        let start = std::time::Instant::now();
        let url = format!("{}/v1/messages", self.base_url);

        debug!("LLM call starting - prompt_length={} chars", prompt.chars().count());

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| AttemptError::Transport(format!("failed to decode response: {}", e)))?;

        info!(
            "LLM API call completed - duration={:.2}s, blocks={}",
            start.elapsed().as_secs_f32(),
            parsed.content.len()
        );

        Ok(parsed)
    }
}
