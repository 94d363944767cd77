//! Transcript export

use std::fmt::Write;

use agora_core::{ParticipantId, Phase};

use crate::error::DebateError;
use crate::session::SessionOutcome;

/// Render a finished session as Markdown
///
/// The transcript is grouped under one heading per phase; verdicts follow
/// in their own section.
pub fn to_markdown(outcome: &SessionOutcome) -> String {
    let config = &outcome.config;
    let mut out = String::new();

    let _ = writeln!(out, "# Debate transcript\n");
    let _ = writeln!(out, "**Motion:** {}\n", config.topic());
    let _ = writeln!(out, "- Session: `{}`", outcome.record.id);
    let _ = writeln!(out, "- Debaters per side: {}", config.debaters_per_side());
    let _ = writeln!(out, "- Judges: {}", config.judges_count());
    let _ = writeln!(out, "- Free debate turns: {}", config.max_free_debate_turns());
    if let Some(reason) = &outcome.aborted {
        let _ = writeln!(out, "- **Ended early:** {}", reason);
    }

    let _ = writeln!(out, "\n## Participants\n");
    let _ = writeln!(out, "| Participant | Model | Style |");
    let _ = writeln!(out, "|---|---|---|");
    for p in outcome.roster.iter() {
        let style = p
            .persona
            .as_deref()
            .and_then(|text| text.lines().next())
            .unwrap_or("-");
        let _ = writeln!(out, "| {} | `{}` | {} |", p.id, p.model, style);
    }

    let mut current: Option<Phase> = None;
    for utterance in outcome.record.transcript() {
        if current != Some(utterance.phase) {
            current = Some(utterance.phase);
            let _ = writeln!(out, "\n## {}\n", utterance.phase.title());
        }
        let _ = writeln!(out, "### {}\n", utterance.speaker);
        for line in utterance.text.lines() {
            let _ = writeln!(out, "> {}", line);
        }
        out.push('\n');
    }

    if !outcome.record.scores().is_empty() {
        let _ = writeln!(out, "## Verdicts\n");
        for score in outcome.record.scores() {
            let _ = writeln!(out, "### {}\n", score.judge);
            let _ = writeln!(out, "{}\n", score.verdict.trim());
        }
    }

    let _ = writeln!(out, "---\n");
    let _ = writeln!(out, "_{}_", outcome.metrics.summary());
    out
}

/// Serialize a session outcome as pretty-printed JSON
pub fn to_json(outcome: &SessionOutcome) -> Result<String, DebateError> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Text of the moderator's closing synthesis, if the session got that far
pub fn final_verdict(outcome: &SessionOutcome) -> Option<&str> {
    outcome
        .record
        .transcript()
        .iter()
        .rev()
        .find(|u| u.phase == Phase::Final && u.speaker == ParticipantId::Moderator)
        .map(|u| u.text.as_str())
}
