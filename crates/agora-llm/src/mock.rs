//! Mock LLM provider for testing and offline runs

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns predefined responses
///
/// Scripted results are consumed first, in order; after that the provider
/// cycles through its canned responses, or answers by role when it has none.
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Canned responses (cycles through them)
    responses: Vec<String>,
    /// Current response index
    index: AtomicUsize,
    /// One-shot results, including failures
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Every request received, for inspection in tests
    requests: Mutex<Vec<LlmRequest>>,
    /// Simulated latency in ms
    latency_ms: u64,
}

impl MockProvider {
    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            responses,
            index: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            latency_ms: 5,
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock that replays `script` and then answers by role
    pub fn scripted(script: Vec<Result<String, LlmError>>) -> Self {
        let mock = Self::smart();
        if let Ok(mut queue) = mock.script.lock() {
            queue.extend(script);
        }
        mock
    }

    /// Create a smart mock that responds based on the participant's role
    pub fn smart() -> Self {
        let mut mock = Self::new(vec![]);
        mock.name = "smart-mock".to_string();
        mock
    }

    /// Override the simulated latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of `complete` calls so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn generate_smart_response(&self, request: &LlmRequest) -> String {
        let system = request.system.to_lowercase();
        let turn = self.call_count();

        if system.contains("you are the moderator") {
            return format!(
                "Thank you all. Let us move on to the next part of the debate. (moderator turn {})",
                turn
            );
        }

        if system.contains("you are judge") {
            return "Verdict: the Pro side argued more convincingly.\n\
                    Pro: 8/10 for structure and evidence.\n\
                    Con: 7/10 for sharp rebuttals."
                .to_string();
        }

        if system.contains("pro side") || system.contains("con side") {
            let side = if system.contains("pro side") { "Pro" } else { "Con" };
            let cue = request
                .last_user_message()
                .map(|m| m.chars().take(60).collect::<String>())
                .unwrap_or_default();
            return format!(
                "As the {} side, I respond to \"{}\": our position holds for three reasons.",
                side, cue
            );
        }

        "Understood. Here is my contribution.".to_string()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        true // Mock is always available
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();

        // Simulate latency
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;

        let scripted = self.script.lock().ok().and_then(|mut q| q.pop_front());

        let content = match scripted {
            Some(result) => {
                self.record(&request);
                result?
            }
            None if self.responses.is_empty() => {
                let text = self.generate_smart_response(&request);
                self.record(&request);
                text
            }
            None => {
                self.record(&request);
                // Cycle through canned responses
                let idx = self.index.fetch_add(1, Ordering::Relaxed);
                self.responses[idx % self.responses.len()].clone()
            }
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone().unwrap_or_else(|| self.name.clone()),
            tokens_used: Some((request.system.len() / 4) as u32 + 100),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl MockProvider {
    fn record(&self, request: &LlmRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
    }
}
