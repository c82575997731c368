use serde::{Deserialize, Deserializer, Serialize};

/* Trending-topic source (TianAPI weibohot) */

#[derive(Debug, Clone, Deserialize)]
pub struct TopicEnvelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub result: Option<TopicResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicResult {
    pub list: Option<Vec<ApiHotItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiHotItem {
    pub hotword: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub hotwordnum: String,
}

// hotwordnum is documented as a string but some entries carry a bare number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/* Generative-text source (Messages API) */

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

#[cfg(test)]
impl MessagesResponse {
    /// Single text block reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            stop_reason: Some("end_turn".to_string()),
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: text.into(),
            }],
            usage: Usage::default(),
        }
    }
}
