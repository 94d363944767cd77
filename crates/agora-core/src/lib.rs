//! # Agora Core
//!
//! Core types for the Agora debate engine:
//! - [`ParticipantId`] / [`Participant`] / [`Roster`] - who can speak
//! - [`DebaterTrait`] - predefined or custom debating styles
//! - [`SessionConfig`] - immutable, validated session parameters
//! - [`SessionRecord`] - append-only transcript plus the disjoint judge score store
//! - [`View`] - the per-participant projection of the record
//!
//! ```rust
//! use agora_core::{ParticipantId, SessionRecord, Phase, Side};
//!
//! let mut record = SessionRecord::new();
//! record.append(ParticipantId::Moderator, Phase::Intro, "raw", "Welcome").unwrap();
//! record.append_score(ParticipantId::Judge(1), "raw", "Pro wins").unwrap();
//!
//! // Debaters never see verdicts, judges only see their own.
//! assert_eq!(record.view_for(&ParticipantId::Debater(Side::Pro, 1)).len(), 1);
//! assert_eq!(record.view_for(&ParticipantId::Judge(1)).len(), 2);
//! assert_eq!(record.view_for(&ParticipantId::Judge(2)).len(), 1);
//! ```

pub mod assignment;
pub mod config;
pub mod error;
pub mod participant;
pub mod persona;
pub mod phase;
pub mod transcript;
pub mod visibility;

pub use assignment::{Assignments, ParticipantAssignment, TeamAssignment, DEFAULT_JUDGE_MODEL};
pub use config::SessionConfig;
pub use error::CoreError;
pub use participant::{Participant, ParticipantId, Roster, Side};
pub use persona::{random_traits, DebaterTrait, TraitProfile, PREDEFINED_TRAITS};
pub use phase::Phase;
pub use transcript::{ScoreRecord, SessionRecord, Utterance};
pub use visibility::{View, ViewEntry};
