//! Extraction and retry for a single turn
//!
//! Every attempt calls the responder again and runs the extractor over the
//! new reply. The first attempt with non-empty text wins. When all attempts
//! come back empty the last raw reply is used verbatim, so a turn always
//! produces an utterance. A generation error ends the turn at once with a
//! fallback utterance and a classified notice.

use agora_core::{Participant, Phase, View};
use agora_llm::{Extractor, FailureClass, LlmError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};

use crate::metrics::SessionMetrics;
use crate::responder::Responder;
use crate::session::RunOptions;

/// Bounded retry for empty extractions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// A policy with at least one attempt
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// How a turn's text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnResolution {
    /// The extractor produced non-empty text
    Extracted,
    /// Every attempt was empty; the last raw reply was used
    RawFallback,
    /// Every attempt was empty and so was the last raw reply
    EmptyFallback,
    /// Generation failed; the fallback utterance was used
    Failed(FailureClass),
}

/// Result of one turn, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    pub raw: String,
    pub text: String,
    pub attempts: u32,
    pub resolution: TurnResolution,
    /// Diagnostic for the observer, set only when generation failed
    pub notice: Option<String>,
}

/// Runs one participant's turn against the responder and extractor
pub struct TurnProcessor<'a> {
    responder: &'a dyn Responder,
    extractor: &'a dyn Extractor,
    options: &'a RunOptions,
    metrics: &'a SessionMetrics,
}

impl<'a> TurnProcessor<'a> {
    pub fn new(
        responder: &'a dyn Responder,
        extractor: &'a dyn Extractor,
        options: &'a RunOptions,
        metrics: &'a SessionMetrics,
    ) -> Self {
        Self {
            responder,
            extractor,
            options,
            metrics,
        }
    }

    /// Produce the text for `participant`'s turn. Never fails.
    pub async fn take_turn(
        &self,
        participant: &Participant,
        phase: Phase,
        history: &View<'_>,
    ) -> TurnOutput {
        let speaker = participant.id;
        let max_attempts = self.options.retry.max_attempts.max(1);
        let mut last_raw = String::new();

        for attempt in 1..=max_attempts {
            let raw = match self.generate(participant, phase, history).await {
                Ok(raw) => raw,
                Err(e) => return self.failed(participant, attempt, e),
            };

            let text = match self.extractor.extract(&raw).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        speaker = %speaker,
                        attempt,
                        error = %e,
                        "extraction failed, using raw reply"
                    );
                    self.metrics.record_extraction_failure();
                    raw.clone()
                }
            };
            debug!(
                speaker = %speaker,
                attempt,
                raw_len = raw.len(),
                text_len = text.len(),
                "extraction attempt"
            );
            trace!(speaker = %speaker, attempt, raw = %raw, text = %text, "extraction pair");

            if !text.trim().is_empty() {
                return TurnOutput {
                    raw,
                    text,
                    attempts: attempt,
                    resolution: TurnResolution::Extracted,
                    notice: None,
                };
            }
            if attempt < max_attempts {
                self.metrics.record_empty_retry();
            }
            last_raw = raw;
        }

        warn!(
            speaker = %speaker,
            attempts = max_attempts,
            "extraction empty on every attempt, falling back to raw reply"
        );
        self.metrics.record_raw_fallback();

        let (text, resolution) = if last_raw.trim().is_empty() {
            (self.options.fallback_for(&speaker.to_string()), TurnResolution::EmptyFallback)
        } else {
            (last_raw.clone(), TurnResolution::RawFallback)
        };
        TurnOutput {
            raw: last_raw,
            text,
            attempts: max_attempts,
            resolution,
            notice: None,
        }
    }

    async fn generate(
        &self,
        participant: &Participant,
        phase: Phase,
        history: &View<'_>,
    ) -> Result<String, LlmError> {
        let call = self.responder.generate(participant, phase, history);
        let result = match self.options.turn_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    self.metrics.record_timeout();
                    Err(LlmError::Timeout(limit))
                }
            },
            None => call.await,
        };
        self.metrics.record_generation(result.is_err());
        result
    }

    fn failed(&self, participant: &Participant, attempt: u32, e: LlmError) -> TurnOutput {
        let name = participant.id.to_string();
        let class = e.class();
        error!(speaker = %name, attempt, class = %class, error = %e, "generation failed");
        TurnOutput {
            raw: String::new(),
            text: self.options.fallback_for(&name),
            attempts: attempt,
            resolution: TurnResolution::Failed(class),
            notice: Some(class.notice(&name, &e.to_string())),
        }
    }
}
