//! Visibility filter
//!
//! Computes the history a participant may condition on. Every participant
//! sees the whole transcript plus the verdicts it authored itself; only the
//! moderator's final synthesis gets every verdict. Views borrow from the
//! record and never modify it.

use crate::participant::ParticipantId;
use crate::transcript::{ScoreRecord, SessionRecord, Utterance};

/// One entry of a participant's view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEntry<'a> {
    Utterance(&'a Utterance),
    Score(&'a ScoreRecord),
}

impl<'a> ViewEntry<'a> {
    /// Author of the entry
    pub fn speaker(&self) -> ParticipantId {
        match self {
            Self::Utterance(u) => u.speaker,
            Self::Score(s) => s.judge,
        }
    }

    /// Cleaned text of the entry
    pub fn text(&self) -> &'a str {
        match self {
            Self::Utterance(u) => &u.text,
            Self::Score(s) => &s.verdict,
        }
    }
}

/// A chronological, read-only projection of the session record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View<'a> {
    pub entries: Vec<ViewEntry<'a>>,
}

impl<'a> View<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewEntry<'a>> {
        self.entries.iter()
    }

    /// Verdicts contained in this view
    pub fn scores(&self) -> impl Iterator<Item = &'a ScoreRecord> + '_ {
        self.entries.iter().filter_map(|e| match e {
            ViewEntry::Score(s) => Some(*s),
            ViewEntry::Utterance(_) => None,
        })
    }
}

impl SessionRecord {
    /// History visible to `viewer` for an ordinary turn
    pub fn view_for(&self, viewer: &ParticipantId) -> View<'_> {
        self.project(|score| &score.judge == viewer)
    }

    /// Transcript plus every verdict; reserved for the moderator's final synthesis
    pub fn full_view(&self) -> View<'_> {
        self.project(|_| true)
    }

    fn project<F>(&self, include: F) -> View<'_>
    where
        F: Fn(&ScoreRecord) -> bool,
    {
        let transcript = self.transcript();
        let mut scores = self.scores().iter().filter(|s| include(s)).peekable();
        let mut entries = Vec::with_capacity(transcript.len());

        for (i, utterance) in transcript.iter().enumerate() {
            while let Some(score) = scores.next_if(|s| s.transcript_mark <= i as u64) {
                entries.push(ViewEntry::Score(score));
            }
            entries.push(ViewEntry::Utterance(utterance));
        }
        entries.extend(scores.map(ViewEntry::Score));

        View { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Side;
    use crate::phase::Phase;

    fn judged_record() -> SessionRecord {
        let mut record = SessionRecord::new();
        record
            .append(ParticipantId::Moderator, Phase::Intro, "hi", "hi")
            .unwrap();
        record
            .append(ParticipantId::Debater(Side::Pro, 1), Phase::Opening, "pro", "pro")
            .unwrap();
        record
            .append(ParticipantId::Moderator, Phase::Judging, "judge now", "judge now")
            .unwrap();
        record.append_score(ParticipantId::Judge(1), "j1", "Pro wins").unwrap();
        record.append_score(ParticipantId::Judge(2), "j2", "Con wins").unwrap();
        record
    }

    #[test]
    fn test_judges_only_see_own_verdicts() {
        let record = judged_record();

        let view = record.view_for(&ParticipantId::Judge(2));
        let authors: Vec<_> = view.scores().map(|s| s.judge).collect();
        assert_eq!(authors, vec![ParticipantId::Judge(2)]);
        assert_eq!(view.len(), 4);

        let view = record.view_for(&ParticipantId::Judge(3));
        assert_eq!(view.scores().count(), 0);
    }

    #[test]
    fn test_debaters_and_moderator_see_transcript_only() {
        let record = judged_record();
        assert_eq!(record.view_for(&ParticipantId::Moderator).len(), 3);
        let view = record.view_for(&ParticipantId::Debater(Side::Con, 1));
        assert!(view.iter().all(|e| matches!(e, ViewEntry::Utterance(_))));
    }

    #[test]
    fn test_full_view_contains_all_verdicts_in_order() {
        let record = judged_record();
        let view = record.full_view();
        let speakers: Vec<_> = view.iter().map(|e| e.speaker()).collect();
        assert_eq!(
            speakers,
            vec![
                ParticipantId::Moderator,
                ParticipantId::Debater(Side::Pro, 1),
                ParticipantId::Moderator,
                ParticipantId::Judge(1),
                ParticipantId::Judge(2),
            ]
        );
    }

    #[test]
    fn test_verdicts_interleave_by_mark() {
        let mut record = SessionRecord::new();
        record
            .append(ParticipantId::Moderator, Phase::Judging, "a", "a")
            .unwrap();
        record.append_score(ParticipantId::Judge(1), "v", "v").unwrap();
        record
            .append(ParticipantId::Moderator, Phase::Final, "b", "b")
            .unwrap();

        let texts: Vec<_> = record.full_view().iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["a", "v", "b"]);
    }

    #[test]
    fn test_projection_does_not_mutate() {
        let record = judged_record();
        let before = (record.transcript().len(), record.scores().len());
        let _a = record.view_for(&ParticipantId::Judge(1));
        let _b = record.full_view();
        assert_eq!(before, (record.transcript().len(), record.scores().len()));
    }
}
