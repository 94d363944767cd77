//! Session driver
//!
//! One loop per session: ask the [`PhaseMachine`] for the next turn, compute
//! the speaker's view, run the turn through the [`TurnProcessor`], store the
//! result and tell the observer. Exactly one generation call is in flight at
//! a time.

use std::sync::Arc;
use std::time::Duration;

use agora_core::{Assignments, ParticipantId, Phase, Roster, SessionConfig, SessionRecord, Side};
use agora_llm::{Extractor, LlmProvider};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::DebateError;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::observer::{Observer, SESSION_END, SYSTEM};
use crate::responder::{LlmResponder, Responder};
use crate::roster::build_roster;
use crate::state_machine::{PhaseMachine, Turn};
use crate::turn::{RetryPolicy, TurnProcessor};

const SPEAKER_PLACEHOLDER: &str = "{speaker}";

/// Per-run knobs that do not change the debate format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    pub retry: RetryPolicy,
    /// Upper bound on one generation call; `None` waits indefinitely
    pub turn_timeout: Option<Duration>,
    /// Text stored when a turn produces nothing usable; `{speaker}` is replaced
    pub fallback_template: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            turn_timeout: None,
            fallback_template: "[{speaker}] is unable to respond right now, please try again later"
                .to_string(),
        }
    }
}

impl RunOptions {
    /// The fallback utterance for `speaker`
    pub fn fallback_for(&self, speaker: &str) -> String {
        self.fallback_template.replace(SPEAKER_PLACEHOLDER, speaker)
    }
}

/// Everything a finished (or aborted) session leaves behind
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub config: SessionConfig,
    pub roster: Roster,
    pub record: SessionRecord,
    /// Phases entered, in order
    pub phases: Vec<Phase>,
    pub metrics: MetricsSnapshot,
    /// Why the session stopped early, if it did
    pub aborted: Option<String>,
}

impl SessionOutcome {
    /// Whether the session ran all the way to End
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.phases.last() == Some(&Phase::End)
    }
}

/// A single debate, from introduction to final verdict
pub struct DebateSession {
    config: SessionConfig,
    roster: Roster,
    machine: PhaseMachine,
    record: SessionRecord,
    responder: Arc<dyn Responder>,
    extractor: Arc<dyn Extractor>,
    observer: Arc<dyn Observer>,
    options: RunOptions,
    metrics: SessionMetrics,
    last_speaker: Option<ParticipantId>,
}

impl std::fmt::Debug for DebateSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebateSession")
            .field("session", &self.record.id)
            .field("machine", &self.machine)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DebateSession {
    /// Create a session.
    ///
    /// Fails if the roster lacks anyone the schedule will call on.
    pub fn new(
        config: SessionConfig,
        roster: Roster,
        responder: Arc<dyn Responder>,
        extractor: Arc<dyn Extractor>,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, DebateError> {
        for id in scheduled_participants(&config) {
            roster.require(&id)?;
        }
        Ok(Self {
            machine: PhaseMachine::new(&config),
            config,
            roster,
            record: SessionRecord::new(),
            responder,
            extractor,
            observer,
            options: RunOptions::default(),
            metrics: SessionMetrics::new(),
            last_speaker: None,
        })
    }

    /// Replace the free-debate random source (deterministic runs)
    pub fn with_rng(mut self, rng: impl RngCore + Send + Sync + 'static) -> Self {
        self.machine = PhaseMachine::with_rng(&self.config, rng);
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Progress line for status displays
    pub fn describe(&self) -> String {
        self.machine.describe()
    }

    /// Run one turn. Returns `Ok(None)` once the session has ended.
    pub async fn step(&mut self) -> Result<Option<Turn>, DebateError> {
        let Some(turn) = self.machine.next_turn(self.last_speaker, &self.roster)? else {
            return Ok(None);
        };
        let participant = self.roster.require(&turn.speaker)?;

        let output = {
            // Only the final synthesis sees every verdict
            let view = if turn.phase == Phase::Final && turn.speaker.is_moderator() {
                self.record.full_view()
            } else {
                self.record.view_for(&turn.speaker)
            };
            TurnProcessor::new(
                self.responder.as_ref(),
                self.extractor.as_ref(),
                &self.options,
                &self.metrics,
            )
            .take_turn(participant, turn.phase, &view)
            .await
        };

        if let Some(notice) = &output.notice {
            self.observer.notify(SYSTEM, notice);
        }

        let name = turn.speaker.to_string();
        if turn.speaker.is_judge() {
            self.record.append_score(turn.speaker, &output.raw, &output.text)?;
        } else {
            self.record
                .append(turn.speaker, turn.phase, &output.raw, &output.text)?;
        }
        self.observer.notify(&name, &output.text);

        self.metrics.record_turn();
        self.last_speaker = Some(turn.speaker);
        info!(
            speaker = %name,
            phase = %turn.phase,
            attempts = output.attempts,
            resolution = ?output.resolution,
            "turn accepted"
        );
        Ok(Some(turn))
    }

    /// Drive the session to the end.
    ///
    /// Errors after start are reported to the observer as a moderator
    /// message and end the session early; the outcome keeps everything
    /// recorded up to that point. The observer always receives
    /// [`SESSION_END`] last.
    pub async fn run(mut self) -> SessionOutcome {
        info!(
            session = %self.record.id,
            topic = self.config.topic(),
            debaters_per_side = self.config.debaters_per_side(),
            judges = self.config.judges_count(),
            "debate started"
        );

        let aborted = loop {
            match self.step().await {
                Ok(Some(_)) => {}
                Ok(None) => break None,
                Err(e) => {
                    error!(error = %e, phase = %self.machine.phase(), "debate aborted");
                    self.observer.notify(
                        &ParticipantId::Moderator.to_string(),
                        &format!("An error occurred during the debate: {}", e),
                    );
                    break Some(e.to_string());
                }
            }
        };
        self.observer.notify(SESSION_END, "The debate has ended.");

        let metrics = self.metrics.snapshot();
        if metrics.generation_failures > 0 {
            warn!(failures = metrics.generation_failures, "some turns used fallback text");
        }
        info!(session = %self.record.id, summary = %metrics.summary(), "debate finished");

        SessionOutcome {
            phases: self.machine.visited().to_vec(),
            config: self.config,
            roster: self.roster,
            record: self.record,
            metrics,
            aborted,
        }
    }
}

/// Build a roster and an LLM-backed responder, then run a whole session
pub async fn start_session<P: LlmProvider + 'static>(
    config: SessionConfig,
    assignments: &Assignments,
    provider: Arc<P>,
    extractor: Arc<dyn Extractor>,
    observer: Arc<dyn Observer>,
    options: RunOptions,
) -> Result<SessionOutcome, DebateError> {
    let roster = build_roster(&config, assignments)?;
    let responder = Arc::new(LlmResponder::new(provider, &config));
    let session = DebateSession::new(config, roster, responder, extractor, observer)?
        .with_options(options);
    Ok(session.run().await)
}

fn scheduled_participants(config: &SessionConfig) -> impl Iterator<Item = ParticipantId> {
    let n = config.debaters_per_side();
    let debaters = [Side::Pro, Side::Con]
        .into_iter()
        .flat_map(move |side| (1..=n).map(move |seat| ParticipantId::Debater(side, seat)));
    std::iter::once(ParticipantId::Moderator)
        .chain(debaters)
        .chain((1..=config.judges_count()).map(ParticipantId::Judge))
}
