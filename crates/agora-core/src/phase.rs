//! Debate phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named stage of the debate.
///
/// Phases are visited strictly in declaration order; `End` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Moderator introduces the topic and the teams
    Intro,
    /// Fixed-order opening statements
    Opening,
    /// Alternating floor debate
    FreeDebate,
    /// Closing statements
    Closing,
    /// Independent judge verdicts
    Judging,
    /// Moderator synthesizes the verdicts
    Final,
    /// Nothing left to say
    End,
}

impl Phase {
    /// All phases in the order a session visits them
    pub const ORDER: [Phase; 7] = [
        Phase::Intro,
        Phase::Opening,
        Phase::FreeDebate,
        Phase::Closing,
        Phase::Judging,
        Phase::Final,
        Phase::End,
    ];

    /// Whether no further turns can happen
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End)
    }

    /// Human-readable section title, used for transcript export
    pub fn title(self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Opening => "Opening Statements",
            Self::FreeDebate => "Free Debate",
            Self::Closing => "Closing Statements",
            Self::Judging => "Judging",
            Self::Final => "Final Verdict",
            Self::End => "End",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intro => "intro",
            Self::Opening => "opening",
            Self::FreeDebate => "free_debate",
            Self::Closing => "closing",
            Self::Judging => "judging",
            Self::Final => "final",
            Self::End => "end",
        };
        f.write_str(name)
    }
}
