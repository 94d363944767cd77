//! # Agora LLM
//!
//! Language-model collaborators for Agora debates.
//!
//! ## Supported Backends
//!
//! | Provider | Type | Key Required |
//! |----------|------|--------------|
//! | OpenRouter / any OpenAI-compatible API | API | `OPENROUTER_API_KEY` |
//! | Mock | Testing | None |
//!
//! ## Quick Start
//!
//! ```rust
//! use agora_llm::{MockProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = MockProvider::constant("The motion stands.");
//!     let response = llm.ask("Open the debate").await.unwrap();
//!     assert_eq!(response, "The motion stands.");
//! }
//! ```
//!
//! ## Extraction
//!
//! Raw model replies often carry reasoning traces. An [`Extractor`] turns
//! them into the clean text that goes into the transcript:
//!
//! ```rust
//! use agora_llm::{Extractor, ReasoningStripExtractor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let clean = ReasoningStripExtractor
//!         .extract("<think>hmm</think> Pro wins.")
//!         .await
//!         .unwrap();
//!     assert_eq!(clean, "Pro wins.");
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod extractor;
pub mod failure;
pub mod mock;
pub mod openai;
pub mod provider;

pub use catalog::{random_assignments, HOST_MODEL, JUDGE_MODELS, MODELS_BY_COMPANY};
pub use config::{ConfigError, LlmConfig};
pub use extractor::{Extractor, LlmExtractor, ReasoningStripExtractor};
pub use failure::FailureClass;
pub use mock::MockProvider;
pub use openai::OpenAICompatProvider;
pub use provider::{ChatMessage, ChatRole, LlmError, LlmProvider, LlmRequest, LlmResponse};
