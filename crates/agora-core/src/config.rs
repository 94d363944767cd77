//! Session configuration
//!
//! [`SessionConfig`] is built once, validated, and never changes for the
//! lifetime of a session.

use serde::Serialize;

use crate::error::CoreError;

/// Immutable debate parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    topic: String,
    debaters_per_side: u32,
    judges_count: u32,
    max_free_debate_turns: u32,
}

impl SessionConfig {
    pub const DEFAULT_DEBATERS_PER_SIDE: u32 = 2;
    pub const DEFAULT_JUDGES_COUNT: u32 = 3;
    pub const DEFAULT_MAX_FREE_DEBATE_TURNS: u32 = 4;

    /// Create a validated configuration
    pub fn new(
        topic: &str,
        debaters_per_side: u32,
        judges_count: u32,
        max_free_debate_turns: u32,
    ) -> Result<Self, CoreError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CoreError::InvalidConfig("topic must not be empty".to_string()));
        }
        if debaters_per_side == 0 {
            return Err(CoreError::InvalidConfig(
                "debaters_per_side must be at least 1".to_string(),
            ));
        }
        if judges_count == 0 {
            return Err(CoreError::InvalidConfig(
                "judges_count must be at least 1".to_string(),
            ));
        }
        if max_free_debate_turns == 0 {
            return Err(CoreError::InvalidConfig(
                "max_free_debate_turns must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            topic: topic.to_string(),
            debaters_per_side,
            judges_count,
            max_free_debate_turns,
        })
    }

    /// Configuration with the default team sizes for a topic
    pub fn with_defaults(topic: &str) -> Result<Self, CoreError> {
        Self::new(
            topic,
            Self::DEFAULT_DEBATERS_PER_SIDE,
            Self::DEFAULT_JUDGES_COUNT,
            Self::DEFAULT_MAX_FREE_DEBATE_TURNS,
        )
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn debaters_per_side(&self) -> u32 {
        self.debaters_per_side
    }

    pub fn judges_count(&self) -> u32 {
        self.judges_count
    }

    pub fn max_free_debate_turns(&self) -> u32 {
        self.max_free_debate_turns
    }

    /// Number of non-moderator turns a complete session produces
    pub fn expected_contributor_turns(&self) -> u64 {
        2 * u64::from(self.debaters_per_side)
            + u64::from(self.max_free_debate_turns)
            + 2
            + u64::from(self.judges_count)
    }
}
