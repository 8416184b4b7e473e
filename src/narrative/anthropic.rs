//! Anthropic Messages API narrator

use super::{prompts, CommentaryRequest, Narrator};
use crate::config::NarrativeConfig;
use crate::error::AppError;
use crate::logging::truncate_for_log;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Anthropic Messages API request (non-streaming, text only)
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// `{"type": "error", "error": {"type": "...", "message": "..."}}`
#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    #[serde(default)]
    message: String,
}

pub struct AnthropicNarrator {
    client: Client,
    config: NarrativeConfig,
}

impl AnthropicNarrator {
    pub fn new(config: NarrativeConfig) -> Result<Self, AppError> {
        if config.api_key.as_deref().map(str::is_empty).unwrap_or(true) {
            return Err(AppError::ConfigError(
                "narrative api_key is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    fn build_request(&self, request: &CommentaryRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model.clone(),
            system: Some(prompts::system_prompt(request.kind)),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompts::user_prompt(request),
            }],
            max_tokens: self.config.max_tokens,
            temperature: Some(0.3),
        }
    }
}

/// Map a non-success response to an error; rate limiting is recognised both
/// by status and by the `rate_limit_error` body type
fn classify_error(status: StatusCode, body: &str) -> AppError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || parsed
            .as_ref()
            .map(|envelope| envelope.error.error_type == "rate_limit_error")
            .unwrap_or(false);

    let message = parsed
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| truncate_for_log(body, 200));

    if rate_limited {
        AppError::RateLimited(message)
    } else {
        AppError::UpstreamError { status, message }
    }
}

#[async_trait]
impl Narrator for AnthropicNarrator {
    async fn generate(&self, request: &CommentaryRequest) -> Result<String, AppError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}/messages", self.config.base_url.trim_end_matches('/'));
        let body = self.build_request(request);

        debug!(
            request_id = %request_id,
            scenario = %request.scenario,
            kind = %request.kind,
            model = %body.model,
            "Sending commentary request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.config.api_key.as_deref().unwrap_or_default())
            .header("anthropic-version", &self.config.api_version)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!(
                request_id = %request_id,
                status = status.as_u16(),
                body = %truncate_for_log(&error_text, 300),
                "Commentary request rejected"
            );
            return Err(classify_error(status, &error_text));
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            request_id = %request_id,
            stop_reason = ?parsed.stop_reason,
            chars = text.chars().count(),
            "Commentary received"
        );

        if text.trim().is_empty() {
            return Err(AppError::InternalError(
                "commentary response contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}
