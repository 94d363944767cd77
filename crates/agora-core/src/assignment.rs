//! Model and persona assignments supplied by the configuration collaborator

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::participant::{ParticipantId, Side};
use crate::persona::DebaterTrait;

/// Model used for a judge seat when no model was assigned to it
pub const DEFAULT_JUDGE_MODEL: &str = "qwen/qwen3-235b-a22b-2507";

/// Model (and optional persona) for one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAssignment {
    pub model: String,
    pub persona: Option<DebaterTrait>,
}

impl ParticipantAssignment {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            persona: None,
        }
    }

    pub fn with_persona(mut self, persona: DebaterTrait) -> Self {
        self.persona = Some(persona);
        self
    }
}

/// One team: the company its models come from and one entry per seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub company: String,
    pub members: Vec<ParticipantAssignment>,
}

/// Every model assignment for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignments {
    pub moderator: String,
    pub pro: TeamAssignment,
    pub con: TeamAssignment,
    pub judges: Vec<String>,
}

impl Assignments {
    /// Team for a side
    pub fn team(&self, side: Side) -> &TeamAssignment {
        match side {
            Side::Pro => &self.pro,
            Side::Con => &self.con,
        }
    }

    /// Check that every debater seat the config schedules has an assignment
    pub fn validate(&self, config: &SessionConfig) -> Result<(), CoreError> {
        if self.moderator.trim().is_empty() {
            return Err(CoreError::InvalidConfig("moderator model is empty".to_string()));
        }
        for side in [Side::Pro, Side::Con] {
            let team = self.team(side);
            let needed = config.debaters_per_side() as usize;
            if team.members.len() < needed {
                return Err(CoreError::MissingParticipant(ParticipantId::Debater(
                    side,
                    team.members.len() as u32 + 1,
                )));
            }
            if let Some(pos) = team.members.iter().position(|m| m.model.trim().is_empty()) {
                return Err(CoreError::InvalidConfig(format!(
                    "{} has an empty model",
                    ParticipantId::Debater(side, pos as u32 + 1)
                )));
            }
        }
        Ok(())
    }

    /// Assignment for a debater seat (1-based)
    pub fn debater(&self, side: Side, seat: u32) -> Option<&ParticipantAssignment> {
        let index = (seat as usize).checked_sub(1)?;
        self.team(side).members.get(index)
    }

    /// Model for a judge seat (1-based), falling back to [`DEFAULT_JUDGE_MODEL`]
    pub fn judge_model(&self, seat: u32) -> &str {
        (seat as usize)
            .checked_sub(1)
            .and_then(|i| self.judges.get(i))
            .map(String::as_str)
            .unwrap_or(DEFAULT_JUDGE_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(company: &str, n: usize) -> TeamAssignment {
        TeamAssignment {
            company: company.to_string(),
            members: (0..n).map(|i| ParticipantAssignment::new(&format!("m{}", i))).collect(),
        }
    }

    #[test]
    fn test_validate_counts() {
        let config = SessionConfig::new("topic", 2, 1, 1).unwrap();
        let mut assignments = Assignments {
            moderator: "host".to_string(),
            pro: team("A", 2),
            con: team("B", 1),
            judges: vec![],
        };
        assert_eq!(
            assignments.validate(&config).unwrap_err(),
            CoreError::MissingParticipant(ParticipantId::Debater(Side::Con, 2))
        );
        assignments.con = team("B", 2);
        assert!(assignments.validate(&config).is_ok());
    }

    #[test]
    fn test_judge_model_fallback() {
        let assignments = Assignments {
            moderator: "host".to_string(),
            pro: team("A", 1),
            con: team("B", 1),
            judges: vec!["openai/gpt-4o".to_string()],
        };
        assert_eq!(assignments.judge_model(1), "openai/gpt-4o");
        assert_eq!(assignments.judge_model(2), DEFAULT_JUDGE_MODEL);
        assert_eq!(assignments.debater(Side::Pro, 1).unwrap().model, "m0");
        assert!(assignments.debater(Side::Pro, 0).is_none());
    }
}
