//! Reply extraction
//!
//! Model replies may carry reasoning traces, markup or meta-commentary. An
//! [`Extractor`] returns the clean answer. Extraction is best-effort cleanup:
//! callers fall back to the raw text when it fails.
//!
//! [`ReasoningStripExtractor`] is idempotent: feeding its output back in
//! returns the same text. [`LlmExtractor`] delegates to a model and makes no
//! such guarantee.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::provider::{LlmError, LlmProvider, LlmRequest};

const EXTRACTION_SYSTEM_PROMPT: &str = "You are a precise information extractor. \
From the given text, extract only the speaker's actual answer. Remove all markup, \
reasoning traces and auxiliary notes. Output the plain answer text and nothing else.";

/// Turns a raw reply into clean text
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, raw: &str) -> Result<String, LlmError>;
}

/// Extraction backed by a chat-completion model
#[derive(Debug)]
pub struct LlmExtractor<P: LlmProvider> {
    provider: Arc<P>,
    model: Option<String>,
}

impl<P: LlmProvider> LlmExtractor<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Use a specific model for extraction calls
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }
}

#[async_trait]
impl<P: LlmProvider + 'static> Extractor for LlmExtractor<P> {
    async fn extract(&self, raw: &str) -> Result<String, LlmError> {
        if raw.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = format!(
            "Extract the plain answer from the following text, removing all markup, \
             reasoning and auxiliary information:\n\n{}",
            raw
        );
        let mut request =
            LlmRequest::with_role(EXTRACTION_SYSTEM_PROMPT, &prompt).with_temperature(0.0);
        if let Some(model) = &self.model {
            request = request.for_model(model);
        }

        let response = self.provider.complete(request).await?;
        Ok(response.content.trim().to_string())
    }
}

/// Deterministic extraction: drops `<think>`-style blocks and trims
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningStripExtractor;

fn reasoning_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?is)<(?:think|thinking|reasoning)>.*?(?:</(?:think|thinking|reasoning)>|\z)",
            )
            .ok()
        })
        .as_ref()
}

impl ReasoningStripExtractor {
    /// Strip reasoning blocks until none remain
    pub fn strip(raw: &str) -> String {
        let Some(pattern) = reasoning_pattern() else {
            return raw.trim().to_string();
        };
        let mut text = raw.to_string();
        loop {
            let next = pattern.replace_all(&text, "").into_owned();
            if next == text {
                break;
            }
            text = next;
        }
        text.trim().to_string()
    }
}

#[async_trait]
impl Extractor for ReasoningStripExtractor {
    async fn extract(&self, raw: &str) -> Result<String, LlmError> {
        Ok(Self::strip(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;

    #[test]
    fn test_strip_blocks() {
        assert_eq!(
            ReasoningStripExtractor::strip("<think>plan\nmore</think>\n  Final answer. "),
            "Final answer."
        );
        assert_eq!(ReasoningStripExtractor::strip("<Reasoning>x</Reasoning>ok"), "ok");
        assert_eq!(ReasoningStripExtractor::strip("<think>never closed"), "");
        assert_eq!(ReasoningStripExtractor::strip("plain"), "plain");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let inputs = [
            "<thi<think>x</think>nk>hidden</think> visible",
            "  <think>a</think> b <thinking>c</thinking> d ",
            "no tags at all",
            "",
        ];
        for input in inputs {
            let once = ReasoningStripExtractor::strip(input);
            assert_eq!(ReasoningStripExtractor::strip(&once), once, "input: {input:?}");
        }
    }

    #[tokio::test]
    async fn test_llm_extractor_trims_and_routes_model() {
        let mock = Arc::new(MockProvider::constant("  Pro wins.  "));
        let extractor = LlmExtractor::new(mock.clone()).with_model("x-ai/grok-4-fast");

        assert_eq!(extractor.extract("<think>..</think>Pro wins.").await.unwrap(), "Pro wins.");
        let requests = mock.requests();
        assert_eq!(requests[0].model.as_deref(), Some("x-ai/grok-4-fast"));
        assert!(requests[0].last_user_message().unwrap().contains("Pro wins."));
    }

    #[tokio::test]
    async fn test_llm_extractor_skips_empty_input() {
        let mock = Arc::new(MockProvider::constant("should not be called"));
        let extractor = LlmExtractor::new(mock.clone());
        assert_eq!(extractor.extract("   ").await.unwrap(), "");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_extractor_propagates_failure() {
        let mock = Arc::new(MockProvider::scripted(vec![Err(LlmError::Unauthorized(
            "bad key".into(),
        ))]));
        let extractor = LlmExtractor::new(mock);
        assert!(extractor.extract("raw").await.is_err());
    }
}
