//! Session counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters for one session
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Turns accepted into the transcript or score store
    pub turns: AtomicU64,
    /// Generation calls made, including retries
    pub generation_calls: AtomicU64,
    /// Generation calls that failed
    pub generation_failures: AtomicU64,
    /// Of those, calls cut off by the turn timeout
    pub timeouts: AtomicU64,
    /// Extractor errors (the raw reply was used instead)
    pub extraction_failures: AtomicU64,
    /// Attempts that produced empty text and were retried
    pub empty_retries: AtomicU64,
    /// Turns that exhausted retries and fell back to the raw reply
    pub raw_fallbacks: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_turn(&self) {
        self.turns.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a generation call
    pub fn record_generation(&self, failed: bool) {
        self.generation_calls.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.generation_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_retry(&self) {
        self.empty_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_raw_fallback(&self) {
        self.raw_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            turns: self.turns.load(Ordering::Relaxed),
            generation_calls: self.generation_calls.load(Ordering::Relaxed),
            generation_failures: self.generation_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            empty_retries: self.empty_retries.load(Ordering::Relaxed),
            raw_fallbacks: self.raw_fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub turns: u64,
    pub generation_calls: u64,
    pub generation_failures: u64,
    pub timeouts: u64,
    pub extraction_failures: u64,
    pub empty_retries: u64,
    pub raw_fallbacks: u64,
}

impl MetricsSnapshot {
    /// Share of generation calls that failed
    pub fn failure_rate(&self) -> f64 {
        if self.generation_calls == 0 {
            0.0
        } else {
            self.generation_failures as f64 / self.generation_calls as f64
        }
    }

    /// One-line summary for the end of a run
    pub fn summary(&self) -> String {
        format!(
            "{} turns, {} model calls ({} failed, {} timed out), {} empty retries, {} raw fallbacks",
            self.turns,
            self.generation_calls,
            self.generation_failures,
            self.timeouts,
            self.empty_retries,
            self.raw_fallbacks,
        )
    }
}
