//! Configuration management for Agora's LLM access
//!
//! Handles the API key, endpoint and default models.

use serde::{Deserialize, Serialize};
use std::env;

use crate::catalog::HOST_MODEL;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// LLM endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (env: OPENROUTER_API_KEY)
    pub api_key: Option<String>,
    /// Chat-completion base URL (env: OPENROUTER_BASE_URL)
    pub base_url: String,
    /// Moderator model (env: AGORA_HOST_MODEL)
    pub host_model: String,
    /// Model used for reply extraction (env: AGORA_EXTRACTOR_MODEL, defaults to the host model)
    pub extractor_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            host_model: HOST_MODEL.to_string(),
            extractor_model: HOST_MODEL.to_string(),
        }
    }
}

impl LlmConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";
    pub const API_KEY_VAR: &'static str = "OPENROUTER_API_KEY";

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let host_model = non_empty("AGORA_HOST_MODEL").unwrap_or_else(|| HOST_MODEL.to_string());
        Self {
            api_key: non_empty(Self::API_KEY_VAR),
            base_url: non_empty("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            extractor_model: non_empty("AGORA_EXTRACTOR_MODEL")
                .unwrap_or_else(|| host_model.clone()),
            host_model,
        }
    }

    /// The API key, or an error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(Self::API_KEY_VAR.to_string()))
    }

    /// Check the endpoint looks usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.host_model.trim().is_empty() {
            return Err(ConfigError::Invalid("host model is empty".to_string()));
        }
        Ok(())
    }
}
