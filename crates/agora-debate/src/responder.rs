//! Generation collaborator seam

use std::sync::Arc;

use agora_core::{Participant, Phase, SessionConfig, View};
use agora_llm::{ChatMessage, LlmError, LlmProvider, LlmRequest};
use async_trait::async_trait;
use tracing::trace;

use crate::prompts;

/// Produces a participant's reply from the history it is allowed to see
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(
        &self,
        participant: &Participant,
        phase: Phase,
        history: &View<'_>,
    ) -> Result<String, LlmError>;
}

/// [`Responder`] backed by an [`LlmProvider`]
///
/// The view becomes a chat: the participant's own entries are `assistant`
/// messages, everyone else's are `user` messages prefixed with the speaker.
#[derive(Debug)]
pub struct LlmResponder<P: LlmProvider> {
    provider: Arc<P>,
    brief: String,
    max_tokens: u32,
}

impl<P: LlmProvider> LlmResponder<P> {
    pub fn new(provider: Arc<P>, config: &SessionConfig) -> Self {
        Self {
            provider,
            brief: prompts::session_brief(config),
            max_tokens: 1024,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the request sent for `participant`
    pub fn request_for(
        &self,
        participant: &Participant,
        phase: Phase,
        history: &View<'_>,
    ) -> LlmRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::user(self.brief.as_str()));
        for entry in history.iter() {
            let speaker = entry.speaker();
            if speaker == participant.id {
                messages.push(ChatMessage::assistant(entry.text()));
            } else {
                messages.push(ChatMessage::user(format!("{}: {}", speaker, entry.text())));
            }
        }
        messages.push(ChatMessage::user(prompts::turn_cue(participant.id, phase)));

        let mut request = LlmRequest::chat(&participant.system_prompt, messages)
            .for_model(&participant.model)
            .with_temperature(participant.temperature);
        request.max_tokens = self.max_tokens;
        request
    }
}

#[async_trait]
impl<P: LlmProvider + 'static> Responder for LlmResponder<P> {
    async fn generate(
        &self,
        participant: &Participant,
        phase: Phase,
        history: &View<'_>,
    ) -> Result<String, LlmError> {
        let request = self.request_for(participant, phase, history);
        trace!(speaker = %participant.id, messages = request.messages.len(), "sending request");
        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{ParticipantId, SessionRecord, Side};
    use agora_llm::{ChatRole, MockProvider};

    #[tokio::test]
    async fn test_history_becomes_chat() {
        let config = SessionConfig::new("t", 1, 1, 1).unwrap();
        let mock = Arc::new(MockProvider::constant("ok"));
        let responder = LlmResponder::new(mock.clone(), &config);

        let pro = ParticipantId::Debater(Side::Pro, 1);
        let mut record = SessionRecord::new();
        record.append(ParticipantId::Moderator, Phase::Intro, "hi", "Welcome").unwrap();
        record.append(pro, Phase::Opening, "x", "My case").unwrap();

        let participant = Participant::new(pro, "openai/gpt-4o", "You argue for the Pro side.")
            .with_temperature(0.5);
        let view = record.view_for(&pro);
        let reply = responder.generate(&participant, Phase::FreeDebate, &view).await.unwrap();
        assert_eq!(reply, "ok");

        let request = &mock.requests()[0];
        assert_eq!(request.model.as_deref(), Some("openai/gpt-4o"));
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[1].content, "Moderator: Welcome");
        assert_eq!(request.messages[2].role, ChatRole::Assistant);
        assert_eq!(request.messages[2].content, "My case");
        assert_eq!(request.messages[3].role, ChatRole::User);
    }
}
