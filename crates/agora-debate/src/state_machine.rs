//! Phase state machine
//!
//! Decides who speaks next. The only inputs are the current [`SessionState`]
//! and the identity of the previous speaker; the only randomness is the seat
//! chosen for each free-debate turn.
//!
//! | Phase       | Speakers                                              |
//! |-------------|-------------------------------------------------------|
//! | Intro       | Moderator                                             |
//! | Opening     | Pro 1, Con 1, Pro 2, Con 2, ... then Moderator        |
//! | FreeDebate  | Pro 1, then alternating sides, random seat, Moderator |
//! | Closing     | Con N, Pro N, Moderator                               |
//! | Judging     | Judge 1 .. Judge J, Moderator                         |
//! | Final       | (nobody; the session ends)                            |

use agora_core::{CoreError, ParticipantId, Phase, Roster, SessionConfig, Side};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mutable scheduling state for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    /// Turns taken so far in Opening or Closing
    pub round_count: u64,
    /// Debater turns taken so far in FreeDebate
    pub free_debate_turns: u32,
    /// Judges that have spoken so far
    pub current_judge_index: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Intro,
            round_count: 0,
            free_debate_turns: 0,
            current_judge_index: 0,
        }
    }
}

/// A scheduled turn: who speaks, and which phase the turn belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: ParticipantId,
    pub phase: Phase,
}

impl Turn {
    fn new(speaker: ParticipantId, phase: Phase) -> Self {
        Self { speaker, phase }
    }
}

/// Turn scheduler
pub struct PhaseMachine {
    debaters_per_side: u32,
    judges_count: u32,
    max_free_debate_turns: u32,
    state: SessionState,
    visited: Vec<Phase>,
    rng: Box<dyn RngCore + Send + Sync>,
}

impl std::fmt::Debug for PhaseMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseMachine")
            .field("state", &self.state)
            .field("visited", &self.visited)
            .finish_non_exhaustive()
    }
}

impl PhaseMachine {
    /// Create a machine seeded from the OS
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a machine with an explicit random source (deterministic tests)
    pub fn with_rng(config: &SessionConfig, rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self {
            debaters_per_side: config.debaters_per_side(),
            judges_count: config.judges_count(),
            max_free_debate_turns: config.max_free_debate_turns(),
            state: SessionState::default(),
            visited: vec![Phase::Intro],
            rng: Box::new(rng),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Phases entered so far, in order
    pub fn visited(&self) -> &[Phase] {
        &self.visited
    }

    /// Pick the next speaker.
    ///
    /// Returns `Ok(None)` once the session has ended. Fails with
    /// [`CoreError::MissingParticipant`] when the rule for the current phase
    /// names someone who is not in `roster`.
    pub fn next_turn(
        &mut self,
        last: Option<ParticipantId>,
        roster: &Roster,
    ) -> Result<Option<Turn>, CoreError> {
        let Some(turn) = self.select(last) else {
            return Ok(None);
        };
        roster.require(&turn.speaker)?;
        debug!(speaker = %turn.speaker, phase = %turn.phase, "next speaker selected");
        Ok(Some(turn))
    }

    /// Human-readable progress line for status displays
    pub fn describe(&self) -> String {
        let s = &self.state;
        match s.phase {
            Phase::Intro => "Introduction".to_string(),
            Phase::Opening => format!(
                "Opening statements ({}/{})",
                s.round_count,
                opening_turns(self.debaters_per_side)
            ),
            Phase::FreeDebate => format!(
                "Free debate ({}/{})",
                s.free_debate_turns, self.max_free_debate_turns
            ),
            Phase::Closing => "Closing statements".to_string(),
            Phase::Judging => format!(
                "Judging ({}/{})",
                s.current_judge_index, self.judges_count
            ),
            Phase::Final => "Final verdict".to_string(),
            Phase::End => "Finished".to_string(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.state.phase, to = %phase, "phase transition");
        self.state.phase = phase;
        self.visited.push(phase);
    }

    fn select(&mut self, last: Option<ParticipantId>) -> Option<Turn> {
        let n = self.debaters_per_side;
        let last_was_moderator = last.is_some_and(|id| id.is_moderator());

        match self.state.phase {
            Phase::Intro => {
                self.enter(Phase::Opening);
                self.state.round_count = 0;
                Some(Turn::new(ParticipantId::Moderator, Phase::Intro))
            }
            Phase::Opening => {
                let i = self.state.round_count;
                if i < opening_turns(n) {
                    self.state.round_count += 1;
                    let side = if i % 2 == 0 { Side::Pro } else { Side::Con };
                    // i / 2 < n, so the seat fits
                    let seat = (i / 2) as u32 + 1;
                    Some(Turn::new(ParticipantId::Debater(side, seat), Phase::Opening))
                } else {
                    self.enter(Phase::FreeDebate);
                    self.state.round_count = 0;
                    self.state.free_debate_turns = 0;
                    Some(Turn::new(ParticipantId::Moderator, Phase::FreeDebate))
                }
            }
            Phase::FreeDebate => {
                if last_was_moderator {
                    self.state.free_debate_turns = 1;
                    return Some(Turn::new(
                        ParticipantId::Debater(Side::Pro, 1),
                        Phase::FreeDebate,
                    ));
                }
                if self.state.free_debate_turns >= self.max_free_debate_turns {
                    self.enter(Phase::Closing);
                    self.state.round_count = 1;
                    return Some(Turn::new(ParticipantId::Moderator, Phase::Closing));
                }
                let side = if self.state.free_debate_turns % 2 == 0 {
                    Side::Pro
                } else {
                    Side::Con
                };
                let seat = self.rng.random_range(1..=n);
                self.state.free_debate_turns += 1;
                Some(Turn::new(ParticipantId::Debater(side, seat), Phase::FreeDebate))
            }
            Phase::Closing => {
                if last_was_moderator {
                    self.state.round_count = 0;
                    Some(Turn::new(ParticipantId::Debater(Side::Con, n), Phase::Closing))
                } else if self.state.round_count < 1 {
                    self.state.round_count += 1;
                    Some(Turn::new(ParticipantId::Debater(Side::Pro, n), Phase::Closing))
                } else {
                    self.enter(Phase::Judging);
                    self.state.round_count = 0;
                    self.state.current_judge_index = 0;
                    Some(Turn::new(ParticipantId::Moderator, Phase::Judging))
                }
            }
            Phase::Judging => {
                if last_was_moderator {
                    self.state.current_judge_index = 1;
                    Some(Turn::new(ParticipantId::Judge(1), Phase::Judging))
                } else if self.state.current_judge_index < self.judges_count {
                    self.state.current_judge_index += 1;
                    Some(Turn::new(
                        ParticipantId::Judge(self.state.current_judge_index),
                        Phase::Judging,
                    ))
                } else {
                    self.enter(Phase::Final);
                    Some(Turn::new(ParticipantId::Moderator, Phase::Final))
                }
            }
            Phase::Final => {
                self.enter(Phase::End);
                None
            }
            Phase::End => None,
        }
    }
}

/// Opening statements in a session: one per debater
fn opening_turns(debaters_per_side: u32) -> u64 {
    2 * u64::from(debaters_per_side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::Participant;

    fn full_roster(n: u32, judges: u32) -> Roster {
        let mut people = vec![Participant::new(ParticipantId::Moderator, "m", "p")];
        for seat in 1..=n {
            people.push(Participant::new(ParticipantId::Debater(Side::Pro, seat), "m", "p"));
            people.push(Participant::new(ParticipantId::Debater(Side::Con, seat), "m", "p"));
        }
        for seat in 1..=judges {
            people.push(Participant::new(ParticipantId::Judge(seat), "m", "p"));
        }
        Roster::new(people).unwrap()
    }

    fn schedule(config: &SessionConfig, seed: u64) -> (Vec<Turn>, Vec<Phase>) {
        let roster = full_roster(config.debaters_per_side(), config.judges_count());
        let mut machine = PhaseMachine::with_rng(config, StdRng::seed_from_u64(seed));
        let mut turns = Vec::new();
        let mut last = None;
        while let Some(turn) = machine.next_turn(last, &roster).unwrap() {
            last = Some(turn.speaker);
            turns.push(turn);
        }
        (turns, machine.visited().to_vec())
    }

    #[test]
    fn test_visits_every_phase_once_in_order() {
        let config = SessionConfig::with_defaults("t").unwrap();
        let (_, visited) = schedule(&config, 7);
        assert_eq!(visited, Phase::ORDER.to_vec());
    }

    #[test]
    fn test_opening_alternates_seats() {
        let config = SessionConfig::new("t", 2, 1, 2).unwrap();
        let (turns, _) = schedule(&config, 1);
        let opening: Vec<_> = turns
            .iter()
            .filter(|t| t.phase == Phase::Opening)
            .map(|t| t.speaker)
            .collect();
        assert_eq!(
            opening,
            vec![
                ParticipantId::Debater(Side::Pro, 1),
                ParticipantId::Debater(Side::Con, 1),
                ParticipantId::Debater(Side::Pro, 2),
                ParticipantId::Debater(Side::Con, 2),
            ]
        );
    }

    #[test]
    fn test_free_debate_alternates_sides() {
        let config = SessionConfig::new("t", 3, 1, 5).unwrap();
        for seed in 0..20 {
            let (turns, _) = schedule(&config, seed);
            let debaters: Vec<_> = turns
                .iter()
                .filter(|t| t.phase == Phase::FreeDebate && !t.speaker.is_moderator())
                .map(|t| t.speaker)
                .collect();
            assert_eq!(debaters.len(), 5);
            assert_eq!(debaters[0], ParticipantId::Debater(Side::Pro, 1));
            for pair in debaters.windows(2) {
                assert_eq!(pair[1].side(), pair[0].side().map(Side::opponent));
            }
            assert!(debaters.iter().all(|d| (1..=3).contains(&d.seat().unwrap())));
        }
    }

    #[test]
    fn test_closing_is_con_then_pro_last_seat() {
        let config = SessionConfig::new("t", 2, 1, 2).unwrap();
        let (turns, _) = schedule(&config, 3);
        let closing: Vec<_> = turns
            .iter()
            .filter(|t| t.phase == Phase::Closing)
            .map(|t| t.speaker)
            .collect();
        assert_eq!(
            closing,
            vec![
                ParticipantId::Moderator,
                ParticipantId::Debater(Side::Con, 2),
                ParticipantId::Debater(Side::Pro, 2),
            ]
        );
    }

    #[test]
    fn test_each_judge_speaks_once() {
        let config = SessionConfig::new("t", 1, 4, 1).unwrap();
        let (turns, _) = schedule(&config, 3);
        let judges: Vec<_> = turns
            .iter()
            .filter(|t| t.speaker.is_judge())
            .map(|t| t.speaker)
            .collect();
        assert_eq!(judges, (1..=4).map(ParticipantId::Judge).collect::<Vec<_>>());
        assert!(turns.iter().filter(|t| t.speaker.is_judge()).all(|t| t.phase == Phase::Judging));
    }

    #[test]
    fn test_turn_count_matches_config() {
        let config = SessionConfig::with_defaults("t").unwrap();
        let (turns, _) = schedule(&config, 11);
        let contributors = turns.iter().filter(|t| !t.speaker.is_moderator()).count();
        assert_eq!(contributors as u64, config.expected_contributor_turns());
        assert_eq!(contributors, 13);
        // intro + four announcements + synthesis
        assert_eq!(turns.iter().filter(|t| t.speaker.is_moderator()).count(), 6);
        assert_eq!(turns.last().unwrap().phase, Phase::Final);
    }

    #[test]
    fn test_missing_participant_fails_fast() {
        let config = SessionConfig::new("t", 2, 1, 1).unwrap();
        let roster = Roster::new(vec![
            Participant::new(ParticipantId::Moderator, "m", "p"),
            Participant::new(ParticipantId::Debater(Side::Pro, 1), "m", "p"),
        ])
        .unwrap();
        let mut machine = PhaseMachine::with_rng(&config, StdRng::seed_from_u64(0));

        let intro = machine.next_turn(None, &roster).unwrap().unwrap();
        let pro = machine.next_turn(Some(intro.speaker), &roster).unwrap().unwrap();
        let err = machine.next_turn(Some(pro.speaker), &roster).unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingParticipant(ParticipantId::Debater(Side::Con, 1))
        );
    }

    #[test]
    fn test_end_is_sticky() {
        let config = SessionConfig::new("t", 1, 1, 1).unwrap();
        let roster = full_roster(1, 1);
        let mut machine = PhaseMachine::with_rng(&config, StdRng::seed_from_u64(0));
        let mut last = None;
        while let Some(turn) = machine.next_turn(last, &roster).unwrap() {
            last = Some(turn.speaker);
        }
        assert_eq!(machine.phase(), Phase::End);
        assert!(machine.next_turn(last, &roster).unwrap().is_none());
        assert_eq!(machine.describe(), "Finished");
    }

    #[test]
    fn test_huge_team_does_not_overflow() {
        let config = SessionConfig::new("t", u32::MAX / 2 + 1, 1, 1).unwrap();
        let roster =
            Roster::new(vec![Participant::new(ParticipantId::Moderator, "m", "p")]).unwrap();
        let mut machine = PhaseMachine::with_rng(&config, StdRng::seed_from_u64(0));

        let intro = machine.next_turn(None, &roster).unwrap().unwrap();
        assert_eq!(
            machine.describe(),
            format!("Opening statements (0/{})", u64::from(u32::MAX) + 1)
        );
        let err = machine.next_turn(Some(intro.speaker), &roster).unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingParticipant(ParticipantId::Debater(Side::Pro, 1))
        );
        assert_eq!(machine.state().round_count, 1);
    }
}
