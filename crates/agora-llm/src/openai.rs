//! OpenAI-compatible chat-completion provider (OpenRouter by default)

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::LlmConfig;
use crate::provider::{ChatMessage, LlmError, LlmProvider, LlmRequest, LlmResponse};

/// Chat-completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completion response body
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Provider for any endpoint speaking the OpenAI chat-completion protocol
#[derive(Debug)]
pub struct OpenAICompatProvider {
    /// API key
    api_key: String,
    /// Default model when the request does not name one
    model: String,
    /// HTTP client
    client: reqwest::Client,
    /// Base URL, including the version segment (e.g. `https://openrouter.ai/api/v1`)
    base_url: String,
}

impl OpenAICompatProvider {
    /// Create a provider for an explicit endpoint
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an OpenRouter provider
    pub fn openrouter(api_key: &str, model: &str) -> Self {
        Self::new(api_key, LlmConfig::DEFAULT_BASE_URL, model)
    }

    /// Create from loaded configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, crate::config::ConfigError> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key, &config.base_url, &config.host_model))
    }

    fn map_status(status: StatusCode, body: String) -> LlmError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(body),
            _ => LlmError::RequestFailed(format!("Status: {}, Body: {}", status, body)),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAICompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .is_ok()
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.base_url);
        let model = request.model.as_deref().unwrap_or(&self.model);

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage {
            role: crate::provider::ChatRole::System,
            content: request.system.clone(),
        });
        messages.extend(request.messages.iter().cloned());

        let body = CompletionRequest {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(model, url = %url, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://openrouter.ai/")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, body));
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: api_response.model.unwrap_or_else(|| model.to_string()),
            tokens_used: api_response.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
