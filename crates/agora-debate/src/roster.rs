//! Roster construction from a config and model assignments

use agora_core::{Assignments, CoreError, Participant, ParticipantId, Roster, SessionConfig, Side};
use tracing::info;

use crate::error::DebateError;
use crate::prompts;

/// Sampling temperature for debaters
pub const DEBATER_TEMPERATURE: f32 = 0.5;

/// Build every participant the schedule will call on.
///
/// Persona traits are resolved here, once; an unknown trait fails the whole
/// build before any turn is taken.
pub fn build_roster(
    config: &SessionConfig,
    assignments: &Assignments,
) -> Result<Roster, DebateError> {
    assignments.validate(config)?;

    let mut people = Vec::with_capacity(
        1 + 2 * config.debaters_per_side() as usize + config.judges_count() as usize,
    );
    people.push(Participant::new(
        ParticipantId::Moderator,
        &assignments.moderator,
        &prompts::moderator_prompt(config),
    ));

    for side in [Side::Pro, Side::Con] {
        for seat in 1..=config.debaters_per_side() {
            let id = ParticipantId::Debater(side, seat);
            let assignment = assignments
                .debater(side, seat)
                .ok_or(CoreError::MissingParticipant(id))?;
            let persona = assignment.persona.as_ref().map(|t| t.resolve()).transpose()?;
            let prompt = prompts::debater_prompt(side, seat, config, persona.as_deref());

            let mut participant = Participant::new(id, &assignment.model, &prompt)
                .with_temperature(DEBATER_TEMPERATURE);
            if let Some(text) = persona {
                participant = participant.with_persona(text);
            }
            people.push(participant);
        }
    }

    for seat in 1..=config.judges_count() {
        people.push(Participant::new(
            ParticipantId::Judge(seat),
            assignments.judge_model(seat),
            &prompts::judge_prompt(seat, config),
        ));
    }

    let roster = Roster::new(people)?;
    info!(participants = roster.len(), "roster built");
    Ok(roster)
}
