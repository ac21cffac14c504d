//! Bounded in-memory log ring feeding the admin dashboard (§3, §4.B).
//!
//! This is independent of the console logger in [`crate::logs::logger`]:
//! every event appended here is also emitted through the `log` facade, but
//! the ring exists so the dashboard can show recent activity without
//! scraping stdout.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::models::log_entry::{LogCategory, LogContext, LogEntry, LogLevel};

/// A fixed-capacity FIFO of [`LogEntry`] values. Oldest entries are dropped
/// once capacity is reached; this is an observability aid, not a durable
/// audit log.
pub struct LogRing {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
    next_sequence: AtomicU64,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Appends an entry, evicting the oldest if the ring is full.
    pub fn push(&self, level: LogLevel, category: LogCategory, message: String, context: LogContext) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let entry = LogEntry { sequence, timestamp: Utc::now(), level, category, message, context };

        let mut entries = self.entries.lock().expect("log ring mutex poisoned");
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns all entries currently held, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        let entries = self.entries.lock().expect("log ring mutex poisoned");
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("log ring mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let ring = LogRing::new(2);
        ring.push(LogLevel::Info, LogCategory::Register, "a".to_string(), LogContext::default());
        ring.push(LogLevel::Info, LogCategory::Register, "b".to_string(), LogContext::default());
        ring.push(LogLevel::Info, LogCategory::Register, "c".to_string(), LogContext::default());

        let snapshot = ring.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].message, "b");
        assert_eq!(snapshot[1].message, "c");
    }

    #[test]
    fn sequence_numbers_are_monotonic() {
        let ring = LogRing::new(10);
        ring.push(LogLevel::Info, LogCategory::Sweep, "x".to_string(), LogContext::default());
        ring.push(LogLevel::Info, LogCategory::Sweep, "y".to_string(), LogContext::default());
        let snapshot = ring.snapshot();
        assert!(snapshot[0].sequence < snapshot[1].sequence);
    }
}
