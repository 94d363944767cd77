//! End-to-end session tests with scripted collaborators

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agora_core::{Participant, ParticipantId, Phase, Roster, SessionConfig, Side, View};
use agora_debate::{
    build_roster, start_session, DebateSession, Observer, RecordingObserver, Responder, RunOptions,
    SessionOutcome, SESSION_END,
};
use agora_llm::{random_assignments, Extractor, LlmError, MockProvider, ReasoningStripExtractor};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// What one participant was shown
#[derive(Debug, Clone)]
struct Seen {
    speaker: ParticipantId,
    phase: Phase,
    transcript_len: usize,
    score_authors: Vec<ParticipantId>,
}

/// Replies with a fixed line per turn and records every view
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Seen>>,
    fail: Option<(ParticipantId, LlmError)>,
}

impl Recorder {
    fn failing(speaker: ParticipantId, error: LlmError) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail: Some((speaker, error)),
        }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for Recorder {
    async fn generate(
        &self,
        participant: &Participant,
        phase: Phase,
        history: &View<'_>,
    ) -> Result<String, LlmError> {
        let score_authors: Vec<_> = history.scores().map(|s| s.judge).collect();
        self.seen.lock().unwrap().push(Seen {
            speaker: participant.id,
            phase,
            transcript_len: history.len() - score_authors.len(),
            score_authors,
        });
        if let Some((who, error)) = &self.fail {
            if *who == participant.id {
                return Err(error.clone());
            }
        }
        Ok(format!("{} speaking during {}", participant.id, phase))
    }
}

fn roster_for(config: &SessionConfig, seed: u64) -> Roster {
    let mut rng = StdRng::seed_from_u64(seed);
    let assignments =
        random_assignments(&mut rng, config.debaters_per_side(), config.judges_count());
    build_roster(config, &assignments).unwrap()
}

async fn run_with(
    config: SessionConfig,
    responder: Arc<dyn Responder>,
    extractor: Arc<dyn Extractor>,
    observer: Arc<dyn Observer>,
    options: RunOptions,
) -> SessionOutcome {
    let roster = roster_for(&config, 1);
    DebateSession::new(config, roster, responder, extractor, observer)
        .unwrap()
        .with_rng(StdRng::seed_from_u64(42))
        .with_options(options)
        .run()
        .await
}

#[tokio::test]
async fn test_default_session_shape() {
    let config =
        SessionConfig::with_defaults("AI will benefit humanity more than harm it").unwrap();
    let responder = Arc::new(Recorder::default());
    let observer = Arc::new(RecordingObserver::default());

    let outcome = run_with(
        config,
        responder.clone(),
        Arc::new(ReasoningStripExtractor),
        observer.clone(),
        RunOptions::default(),
    )
    .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.phases, Phase::ORDER.to_vec());

    let transcript = outcome.record.transcript();
    let scores = outcome.record.scores();
    let contributors =
        transcript.iter().filter(|u| !u.speaker.is_moderator()).count() + scores.len();
    assert_eq!(contributors, 13);
    assert_eq!(scores.len(), 3);

    let opening: Vec<_> = transcript
        .iter()
        .filter(|u| u.phase == Phase::Opening)
        .map(|u| u.speaker)
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

    let free: Vec<_> = transcript
        .iter()
        .filter(|u| u.phase == Phase::FreeDebate && !u.speaker.is_moderator())
        .map(|u| u.speaker.side().unwrap())
        .collect();
    assert_eq!(free, vec![Side::Pro, Side::Con, Side::Pro, Side::Con]);

    // one notification per stored entry, then the sentinel
    let notes = observer.notifications();
    assert_eq!(notes.len(), transcript.len() + scores.len() + 1);
    assert!(notes.last().unwrap().is_end());
    assert_eq!(notes.iter().filter(|n| n.speaker == SESSION_END).count(), 1);
    assert!(observer.notices().is_empty());

    assert_eq!(outcome.metrics.turns as usize, transcript.len() + scores.len());
    assert_eq!(responder.seen().len(), transcript.len() + scores.len());
}

#[tokio::test]
async fn test_judges_are_isolated() {
    let config = SessionConfig::new("Homework should be abolished", 1, 3, 2).unwrap();
    let responder = Arc::new(Recorder::default());

    let outcome = run_with(
        config,
        responder.clone(),
        Arc::new(ReasoningStripExtractor),
        Arc::new(RecordingObserver::default()),
        RunOptions::default(),
    )
    .await;

    let seen = responder.seen();
    let judge_views: Vec<_> = seen.iter().filter(|s| s.speaker.is_judge()).collect();
    assert_eq!(judge_views.len(), 3);
    for view in &judge_views {
        assert!(view.score_authors.iter().all(|author| *author == view.speaker));
        assert_eq!(view.transcript_len, outcome.record.transcript().len() - 1);
    }

    let synthesis = seen
        .iter()
        .find(|s| s.speaker.is_moderator() && s.phase == Phase::Final)
        .unwrap();
    assert_eq!(
        synthesis.score_authors,
        vec![ParticipantId::Judge(1), ParticipantId::Judge(2), ParticipantId::Judge(3)]
    );

    // no debater or earlier moderator turn ever saw a verdict
    assert!(seen
        .iter()
        .filter(|s| s.phase != Phase::Final)
        .all(|s| s.score_authors.is_empty()));

    // verdicts stay out of the shared transcript
    assert!(outcome.record.transcript().iter().all(|u| !u.speaker.is_judge()));
}

/// Returns numbered replies for one speaker, a normal line for everyone else
struct EmptyForPro1 {
    count: Mutex<u32>,
}

#[async_trait]
impl Responder for EmptyForPro1 {
    async fn generate(
        &self,
        participant: &Participant,
        _phase: Phase,
        _history: &View<'_>,
    ) -> Result<String, LlmError> {
        if participant.id == ParticipantId::Debater(Side::Pro, 1) {
            let mut count = self.count.lock().unwrap();
            *count += 1;
            return Ok(format!("<think>only thoughts</think> EMPTY raw {}", *count));
        }
        Ok(format!("{} here", participant.id))
    }
}

/// Extracts nothing from replies marked EMPTY
struct DropsMarked;

#[async_trait]
impl Extractor for DropsMarked {
    async fn extract(&self, raw: &str) -> Result<String, LlmError> {
        if raw.contains("EMPTY") {
            Ok(String::new())
        } else {
            Ok(raw.trim().to_string())
        }
    }
}

#[tokio::test]
async fn test_empty_extraction_falls_back_to_third_raw_reply() {
    let config = SessionConfig::new("Zoos are ethical", 1, 1, 1).unwrap();
    let responder = Arc::new(EmptyForPro1 { count: Mutex::new(0) });

    let outcome = run_with(
        config,
        responder.clone(),
        Arc::new(DropsMarked),
        Arc::new(RecordingObserver::default()),
        RunOptions::default(),
    )
    .await;

    let opening = outcome
        .record
        .transcript()
        .iter()
        .find(|u| u.phase == Phase::Opening)
        .unwrap();
    assert_eq!(opening.speaker, ParticipantId::Debater(Side::Pro, 1));
    assert_eq!(opening.text, "<think>only thoughts</think> EMPTY raw 3");
    assert_eq!(opening.raw, opening.text);
    assert!(outcome.metrics.raw_fallbacks >= 1);
}

#[tokio::test]
async fn test_rate_limited_judge_gets_fallback_and_one_notice() {
    let config = SessionConfig::new("Space exploration is worth the cost", 1, 3, 1).unwrap();
    let responder = Arc::new(Recorder::failing(
        ParticipantId::Judge(2),
        LlmError::RateLimited("429 Too Many Requests".into()),
    ));
    let observer = Arc::new(RecordingObserver::default());
    let options = RunOptions::default();

    let outcome = run_with(
        config,
        responder,
        Arc::new(ReasoningStripExtractor),
        observer.clone(),
        options.clone(),
    )
    .await;

    assert!(outcome.is_complete());
    let notices = observer.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("[Judge 2]"));
    assert!(notices[0].contains("rate limit"));

    let judge2 = &outcome.record.scores()[1];
    assert_eq!(judge2.judge, ParticipantId::Judge(2));
    assert_eq!(judge2.verdict, options.fallback_for("Judge 2"));
    assert_eq!(outcome.record.scores().len(), 3);
    assert_eq!(outcome.metrics.generation_failures, 1);
}

/// Hangs for one speaker
struct StallsCon1;

#[async_trait]
impl Responder for StallsCon1 {
    async fn generate(
        &self,
        participant: &Participant,
        _phase: Phase,
        _history: &View<'_>,
    ) -> Result<String, LlmError> {
        if participant.id == ParticipantId::Debater(Side::Con, 1) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(format!("{} here", participant.id))
    }
}

#[tokio::test(start_paused = true)]
async fn test_turn_timeout_produces_fallback() {
    let config = SessionConfig::new("Cash should be phased out", 1, 1, 1).unwrap();
    let observer = Arc::new(RecordingObserver::default());
    let options = RunOptions {
        turn_timeout: Some(Duration::from_secs(30)),
        ..RunOptions::default()
    };

    let outcome = run_with(
        config,
        Arc::new(StallsCon1),
        Arc::new(ReasoningStripExtractor),
        observer.clone(),
        options.clone(),
    )
    .await;

    assert!(outcome.is_complete());
    let con_turns: Vec<_> = outcome
        .record
        .transcript()
        .iter()
        .filter(|u| u.speaker == ParticipantId::Debater(Side::Con, 1))
        .collect();
    assert!(!con_turns.is_empty());
    assert!(con_turns.iter().all(|u| u.text == options.fallback_for("Con Debater 1")));
    assert_eq!(observer.notices().len(), con_turns.len());
    assert_eq!(outcome.metrics.timeouts as usize, con_turns.len());
}

#[tokio::test]
async fn test_start_session_with_mock_provider() {
    let config = SessionConfig::new("Remote work beats the office", 2, 2, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let assignments = random_assignments(&mut rng, 2, 2);
    let provider = Arc::new(MockProvider::smart());
    let observer = Arc::new(RecordingObserver::default());

    let outcome = start_session(
        config.clone(),
        &assignments,
        provider.clone(),
        Arc::new(ReasoningStripExtractor),
        observer.clone(),
        RunOptions::default(),
    )
    .await
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(
        (outcome.record.transcript().len() + outcome.record.scores().len()) as u64,
        // contributors plus intro, four announcements and the synthesis
        config.expected_contributor_turns() + 6
    );
    assert!(outcome.record.scores().iter().all(|s| s.verdict.starts_with("Verdict:")));
    assert!(outcome
        .record
        .transcript()
        .iter()
        .filter(|u| u.speaker.side() == Some(Side::Con))
        .all(|u| u.text.starts_with("As the Con side")));

    // every request went to the model assigned to its speaker
    let judge_model = outcome.roster.require(&ParticipantId::Judge(1)).unwrap().model.clone();
    assert!(provider
        .requests()
        .iter()
        .any(|r| r.model.as_deref() == Some(judge_model.as_str())));
}

#[tokio::test]
async fn test_same_seed_same_schedule() {
    let speakers = |outcome: SessionOutcome| -> Vec<ParticipantId> {
        outcome.record.transcript().iter().map(|u| u.speaker).collect()
    };
    let config = SessionConfig::new("Nuclear power is green", 3, 1, 6).unwrap();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let outcome = run_with(
            config.clone(),
            Arc::new(Recorder::default()),
            Arc::new(ReasoningStripExtractor),
            Arc::new(RecordingObserver::default()),
            RunOptions::default(),
        )
        .await;
        runs.push(speakers(outcome));
    }
    assert_eq!(runs[0], runs[1]);
}
