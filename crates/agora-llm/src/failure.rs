//! Failure classification for generation errors
//!
//! Generation failures never abort a debate; they are turned into a short,
//! classified notice for the observer and a fallback utterance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of a generation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Rate limit or quota exhausted
    RateLimit,
    /// Network, timeout or provider availability problem
    Connection,
    /// Bad or missing credentials
    Authentication,
    /// The model rejected or could not serve the request
    Model,
    Unknown,
}

impl FailureClass {
    /// Classify from free-form error text
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("rate limit") || lower.contains("quota") {
            Self::RateLimit
        } else if lower.contains("connection") || lower.contains("timeout") {
            Self::Connection
        } else if lower.contains("authentication") || lower.contains("api key") {
            Self::Authentication
        } else if lower.contains("model") {
            Self::Model
        } else {
            Self::Unknown
        }
    }

    /// Human-readable diagnostic for `speaker`
    pub fn notice(self, speaker: &str, detail: &str) -> String {
        match self {
            Self::RateLimit => {
                format!("[{}] hit the API rate limit, please try again later", speaker)
            }
            Self::Connection => {
                format!("[{}] network problem, please check the connection", speaker)
            }
            Self::Authentication => {
                format!("[{}] API authentication failed, please check the API key", speaker)
            }
            Self::Model => format!("[{}] model call failed: {}", speaker, detail),
            Self::Unknown => format!("[{}] unexpected error: {}", speaker, detail),
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RateLimit => "rate_limit",
            Self::Connection => "connection",
            Self::Authentication => "authentication",
            Self::Model => "model",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
