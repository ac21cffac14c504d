//! Structured log entry stored in the in-memory log ring (§3, §4.B).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log entry, independent of the `log` crate's `Level` so the
/// ring's JSON shape doesn't depend on an upstream crate's representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Short category tag grouping related log entries for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogCategory {
    Register,
    Forward,
    Sweep,
    Reject,
    Error,
}

/// Structured context attached to a log entry. All fields are optional;
/// only the ones relevant to the event are populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Maximum length a truncated body or message snippet may occupy, per §3.
pub const MAX_SNIPPET_CHARS: usize = 200;

/// One entry in the log ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number, used to break ties when sorting
    /// newest-first without relying on wall-clock resolution.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "is_default_context")]
    pub context: LogContext,
}

fn is_default_context(ctx: &LogContext) -> bool {
    ctx.service.is_none()
        && ctx.upstream_url.is_none()
        && ctx.latency_ms.is_none()
        && ctx.status_code.is_none()
}

/// Truncates a body snippet to [`MAX_SNIPPET_CHARS`] characters for storage
/// in a log entry's context/message.
pub fn truncate_snippet(body: &str) -> String {
    if body.chars().count() <= MAX_SNIPPET_CHARS {
        body.to_string()
    } else {
        body.chars().take(MAX_SNIPPET_CHARS).collect()
    }
}
