//! Error types for agora-core

use thiserror::Error;

use crate::participant::ParticipantId;

/// Errors raised by core types. All of them are configuration or programming
/// errors: nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No participant registered for {0}")]
    MissingParticipant(ParticipantId),
    #[error("Unknown debater trait: {0}")]
    UnknownTrait(String),
    #[error("{speaker} cannot be recorded in the {stream}")]
    Misrouted {
        speaker: ParticipantId,
        stream: &'static str,
    },
}
