//! Participant identities and the session roster
//!
//! A [`Participant`] is a pure responder: it owns its model assignment and
//! resolved prompt text, never any transcript state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Debate side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Pro,
    Con,
}

impl Side {
    /// The other side
    pub fn opponent(self) -> Self {
        match self {
            Self::Pro => Self::Con,
            Self::Con => Self::Pro,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pro => f.write_str("Pro"),
            Self::Con => f.write_str("Con"),
        }
    }
}

/// Identity of a participant: role tag, side (debaters only) and 1-based seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantId {
    Moderator,
    Debater(Side, u32),
    Judge(u32),
}

impl ParticipantId {
    pub fn is_moderator(&self) -> bool {
        matches!(self, Self::Moderator)
    }

    pub fn is_judge(&self) -> bool {
        matches!(self, Self::Judge(_))
    }

    /// Side for debaters, `None` otherwise
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Debater(side, _) => Some(*side),
            _ => None,
        }
    }

    /// Seat index (1-based) for debaters and judges
    pub fn seat(&self) -> Option<u32> {
        match self {
            Self::Moderator => None,
            Self::Debater(_, seat) | Self::Judge(seat) => Some(*seat),
        }
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moderator => f.write_str("Moderator"),
            Self::Debater(side, seat) => write!(f, "{} Debater {}", side, seat),
            Self::Judge(seat) => write!(f, "Judge {}", seat),
        }
    }
}

/// A named responder backed by a model assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Who this is
    pub id: ParticipantId,
    /// Model identifier (e.g. "openai/gpt-4o")
    pub model: String,
    /// Persona prompt text, resolved once at construction
    pub persona: Option<String>,
    /// System prompt used for every generation call
    pub system_prompt: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl Participant {
    /// Create a participant with the default temperature
    pub fn new(id: ParticipantId, model: &str, system_prompt: &str) -> Self {
        Self {
            id,
            model: model.to_string(),
            persona: None,
            system_prompt: system_prompt.to_string(),
            temperature: 0.7,
        }
    }

    /// Attach resolved persona text
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The fixed set of participants for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Build a roster, rejecting duplicate identities
    pub fn new(participants: Vec<Participant>) -> Result<Self, CoreError> {
        for (i, p) in participants.iter().enumerate() {
            if participants[..i].iter().any(|q| q.id == p.id) {
                return Err(CoreError::InvalidConfig(format!(
                    "duplicate participant: {}",
                    p.id
                )));
            }
        }
        Ok(Self { participants })
    }

    /// Look up a participant
    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Look up a participant that a schedule rule depends on
    pub fn require(&self, id: &ParticipantId) -> Result<&Participant, CoreError> {
        self.get(id).ok_or(CoreError::MissingParticipant(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ParticipantId::Moderator.to_string(), "Moderator");
        assert_eq!(ParticipantId::Debater(Side::Con, 2).to_string(), "Con Debater 2");
        assert_eq!(ParticipantId::Judge(3).to_string(), "Judge 3");
    }

    #[test]
    fn test_accessors() {
        let id = ParticipantId::Debater(Side::Pro, 1);
        assert_eq!(id.side(), Some(Side::Pro));
        assert_eq!(id.seat(), Some(1));
        assert!(!id.is_judge());
        assert!(ParticipantId::Judge(2).is_judge());
        assert_eq!(ParticipantId::Moderator.seat(), None);
        assert_eq!(Side::Pro.opponent(), Side::Con);
    }

    #[test]
    fn test_roster_lookup() {
        let roster = Roster::new(vec![
            Participant::new(ParticipantId::Moderator, "host", "moderate"),
            Participant::new(ParticipantId::Judge(1), "judge", "judge"),
        ])
        .unwrap();

        assert!(roster.get(&ParticipantId::Moderator).is_some());
        assert_eq!(
            roster.require(&ParticipantId::Judge(2)).unwrap_err(),
            CoreError::MissingParticipant(ParticipantId::Judge(2))
        );
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let result = Roster::new(vec![
            Participant::new(ParticipantId::Moderator, "a", "x"),
            Participant::new(ParticipantId::Moderator, "b", "y"),
        ]);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_id_serde_shape() {
        let json = serde_json::to_string(&ParticipantId::Debater(Side::Pro, 2)).unwrap();
        assert_eq!(json, r#"{"debater":["pro",2]}"#);
    }
}
