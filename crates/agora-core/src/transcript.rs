//! Transcript and score store
//!
//! [`SessionRecord`] holds two disjoint append-only streams: the shared
//! transcript of moderator and debater utterances, and the judges' verdicts.
//! Sequence numbers are assigned here, so neither stream can have gaps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::participant::ParticipantId;
use crate::phase::Phase;

/// One accepted contribution to the shared transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Position in the transcript (0-based)
    pub seq: u64,
    /// Who said it
    pub speaker: ParticipantId,
    /// Phase the turn belonged to
    pub phase: Phase,
    /// Model output as received
    pub raw: String,
    /// Cleaned text that other participants condition on
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A judge's verdict, kept out of the shared transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Position in the score stream (0-based)
    pub seq: u64,
    pub judge: ParticipantId,
    pub raw: String,
    pub verdict: String,
    /// Number of transcript utterances that existed when this was recorded
    pub transcript_mark: u64,
    pub created_at: DateTime<Utc>,
}

/// Transcript plus score store for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier
    pub id: Uuid,
    transcript: Vec<Utterance>,
    scores: Vec<ScoreRecord>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Vec::new(),
            scores: Vec::new(),
        }
    }

    /// Append a moderator or debater utterance
    pub fn append(
        &mut self,
        speaker: ParticipantId,
        phase: Phase,
        raw: &str,
        text: &str,
    ) -> Result<&Utterance, CoreError> {
        if speaker.is_judge() {
            return Err(CoreError::Misrouted {
                speaker,
                stream: "transcript",
            });
        }
        let seq = self.transcript.len() as u64;
        self.transcript.push(Utterance {
            seq,
            speaker,
            phase,
            raw: raw.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });
        tracing::trace!(seq, speaker = %speaker, "utterance appended");
        Ok(&self.transcript[seq as usize])
    }

    /// Append a judge's verdict
    pub fn append_score(
        &mut self,
        judge: ParticipantId,
        raw: &str,
        verdict: &str,
    ) -> Result<&ScoreRecord, CoreError> {
        if !judge.is_judge() {
            return Err(CoreError::Misrouted {
                speaker: judge,
                stream: "score store",
            });
        }
        let seq = self.scores.len() as u64;
        self.scores.push(ScoreRecord {
            seq,
            judge,
            raw: raw.to_string(),
            verdict: verdict.to_string(),
            transcript_mark: self.transcript.len() as u64,
            created_at: Utc::now(),
        });
        tracing::trace!(seq, judge = %judge, "score recorded");
        Ok(&self.scores[seq as usize])
    }

    /// The shared transcript, in sequence order
    pub fn transcript(&self) -> &[Utterance] {
        &self.transcript
    }

    /// All verdicts, in sequence order
    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    /// The most recent utterance, if any
    pub fn last_utterance(&self) -> Option<&Utterance> {
        self.transcript.last()
    }
}
