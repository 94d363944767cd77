//! Notification sink
//!
//! The session reports each accepted entry exactly once, in acceptance
//! order, and finishes with a [`SESSION_END`] notification. Observers have
//! no way to influence the session.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Speaker identity of the final notification
pub const SESSION_END: &str = "__session_end__";

/// Speaker identity for diagnostic notices
pub const SYSTEM: &str = "System";

/// One-way sink for session progress
pub trait Observer: Send + Sync {
    fn notify(&self, speaker: &str, text: &str);
}

impl<F> Observer for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn notify(&self, speaker: &str, text: &str) {
        self(speaker, text)
    }
}

/// An owned notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub speaker: String,
    pub text: String,
}

impl Notification {
    /// Whether this closes the stream
    pub fn is_end(&self) -> bool {
        self.speaker == SESSION_END
    }

    /// Whether this is a diagnostic notice rather than a transcript entry
    pub fn is_system(&self) -> bool {
        self.speaker == SYSTEM
    }
}

/// Forwards notifications over an unbounded channel
///
/// Sends never block; if the receiver is gone they are dropped.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelObserver {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Observer for ChannelObserver {
    fn notify(&self, speaker: &str, text: &str) {
        let _ = self.tx.send(Notification {
            speaker: speaker.to_string(),
            text: text.to_string(),
        });
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&self, _speaker: &str, _text: &str) {}
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingObserver {
    /// Notifications received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Diagnostic notices received so far
    pub fn notices(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(Notification::is_system)
            .map(|n| n.text)
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, speaker: &str, text: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(Notification {
                speaker: speaker.to_string(),
                text: text.to_string(),
            });
        }
    }
}
