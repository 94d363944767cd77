//! Error types for agora-debate

use agora_core::CoreError;
use thiserror::Error;

/// Errors that stop a session.
///
/// Generation and extraction failures never show up here: the turn layer
/// absorbs them into fallback utterances.
#[derive(Debug, Error)]
pub enum DebateError {
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),
    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}
