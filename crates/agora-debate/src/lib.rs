//! # Agora Debate
//!
//! The debate orchestration core:
//!
//! - [`PhaseMachine`] - decides who speaks next and owns the session state
//! - [`TurnProcessor`] - generation, extraction and bounded retry for one turn
//! - [`DebateSession`] - the driver loop tying schedule, visibility and storage together
//! - [`Observer`] - one-way notification sink for UIs and logs
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use agora_core::SessionConfig;
//! use agora_debate::{build_roster, DebateSession, LlmResponder, RecordingObserver};
//! use agora_llm::{random_assignments, MockProvider, ReasoningStripExtractor};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SessionConfig::new("Remote work beats the office", 1, 1, 2).unwrap();
//!     let mut rng = StdRng::seed_from_u64(1);
//!     let assignments = random_assignments(&mut rng, 1, 1);
//!     let roster = build_roster(&config, &assignments).unwrap();
//!
//!     let responder = Arc::new(LlmResponder::new(Arc::new(MockProvider::smart()), &config));
//!     let observer = Arc::new(RecordingObserver::default());
//!
//!     let extractor = Arc::new(ReasoningStripExtractor);
//!     let outcome = DebateSession::new(config, roster, responder, extractor, observer.clone())
//!         .unwrap()
//!         .with_rng(rng)
//!         .run()
//!         .await;
//!
//!     assert!(outcome.is_complete());
//!     assert_eq!(outcome.record.scores().len(), 1);
//! }
//! ```

pub mod error;
pub mod export;
pub mod metrics;
pub mod observer;
pub mod prompts;
pub mod responder;
pub mod roster;
pub mod session;
pub mod state_machine;
pub mod turn;

pub use error::DebateError;
pub use export::{final_verdict, to_json, to_markdown};
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use observer::{
    ChannelObserver, Notification, NullObserver, Observer, RecordingObserver, SESSION_END, SYSTEM,
};
pub use responder::{LlmResponder, Responder};
pub use roster::build_roster;
pub use session::{start_session, DebateSession, RunOptions, SessionOutcome};
pub use state_machine::{PhaseMachine, SessionState, Turn};
pub use turn::{RetryPolicy, TurnOutput, TurnProcessor, TurnResolution};
