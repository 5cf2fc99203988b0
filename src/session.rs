//! Session Log Sink
//!
//! Append-only observability sink for one execution: user input, agent
//! reasoning, tool activity, and system notes. The core functions correctly
//! when the sink is a no-op; nothing reads the log back during execution.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// User input
    User,
    /// Agent reasoning or decision
    Agent,
    /// Tool call result
    Tool,
    /// System message
    System,
}

/// One appended log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Message kind
    pub kind: MessageKind,
    /// Message content
    pub content: String,
    /// Structured metadata (tool parameters, results, counts)
    pub metadata: Value,
    /// When the entry was appended
    pub timestamp: DateTime<Utc>,
}

/// Append-only sink for session messages.
pub trait SessionLog: Send + Sync {
    /// Append one entry. Implementations must not fail the caller.
    fn append(&self, kind: MessageKind, content: &str, metadata: Value);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionLog;

impl SessionLog for NoopSessionLog {
    fn append(&self, _kind: MessageKind, _content: &str, _metadata: Value) {}
}

/// Sink that keeps entries in memory, for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemorySessionLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySessionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries appended so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Entries of one kind.
    pub fn entries_of_kind(&self, kind: MessageKind) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }
}

impl SessionLog for MemorySessionLog {
    fn append(&self, kind: MessageKind, content: &str, metadata: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                kind,
                content: content.to_string(),
                metadata,
                timestamp: Utc::now(),
            });
        }
    }
}
