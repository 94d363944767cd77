//! LLM Provider trait and common types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::failure::FailureClass;

/// Errors from LLM providers
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Authentication failed: {0}")]
    Unauthorized(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Provider not available")]
    NotAvailable,
}

impl LlmError {
    /// Classify the failure for user-facing diagnostics
    pub fn class(&self) -> FailureClass {
        match self {
            Self::RateLimited(_) => FailureClass::RateLimit,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::NotAvailable => {
                FailureClass::Connection
            }
            Self::Unauthorized(_) => FailureClass::Authentication,
            Self::RequestFailed(msg) | Self::InvalidResponse(msg) => {
                FailureClass::from_message(msg)
            }
        }
    }
}

/// Author role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat-completion conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A request to an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// System prompt (role/persona)
    pub system: String,
    /// Conversation after the system prompt
    pub messages: Vec<ChatMessage>,
    /// Model override; providers fall back to their configured model
    pub model: Option<String>,
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl LlmRequest {
    /// Create a simple request with default settings
    pub fn simple(prompt: &str) -> Self {
        Self::with_role("You are a helpful assistant.", prompt)
    }

    /// Create a request with a specific role
    pub fn with_role(system: &str, prompt: &str) -> Self {
        Self::chat(system, vec![ChatMessage::user(prompt)])
    }

    /// Create a multi-message request
    pub fn chat(system: &str, messages: Vec<ChatMessage>) -> Self {
        Self {
            system: system.to_string(),
            messages,
            model: None,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    /// Route the request to a specific model
    pub fn for_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Text of the last user message, if any
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,
    /// Model used
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Time taken in milliseconds
    pub latency_ms: u64,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Generate a completion
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Generate with a simple prompt (convenience method)
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.complete(LlmRequest::simple(prompt)).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(
            LlmError::RateLimited("429".into()).class(),
            FailureClass::RateLimit
        );
        assert_eq!(
            LlmError::Timeout(Duration::from_secs(5)).class(),
            FailureClass::Connection
        );
        assert_eq!(
            LlmError::Unauthorized("bad key".into()).class(),
            FailureClass::Authentication
        );
        assert_eq!(
            LlmError::RequestFailed("model not found".into()).class(),
            FailureClass::Model
        );
        assert_eq!(
            LlmError::RequestFailed("teapot".into()).class(),
            FailureClass::Unknown
        );
    }

    #[test]
    fn test_request_builders() {
        let request = LlmRequest::with_role("judge", "score it").for_model("openai/gpt-4o");
        assert_eq!(request.model.as_deref(), Some("openai/gpt-4o"));
        assert_eq!(request.last_user_message(), Some("score it"));

        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
