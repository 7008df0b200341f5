//! Session state: the editable line buffer plus the append-only transcript.
//!
//! A `Session` is created with an empty buffer and a transcript seeded with a
//! single `Output` banner entry. From then on:
//! - the buffer only changes through `core_text::LineBuffer` operations;
//! - the transcript only grows. Entries are never edited, reordered or removed
//!   individually; the sole exception is the explicit `clear_all` action which
//!   wipes everything at once.
//!
//! The REPL round trip (`submit`) lives in [`repl`]; the injected evaluation
//! capability in [`eval`].

use std::fmt;

pub mod eval;
pub mod repl;

pub use core_text::{EditorState, LineBuffer};
pub use eval::{Evaluator, FnEvaluator};
pub use repl::SubmitOutcome;

/// Kind of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Input,
    Output,
    Error,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Input => "input",
            LogKind::Output => "output",
            LogKind::Error => "error",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable transcript record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
}

impl LogEntry {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
    pub fn input(text: impl Into<String>) -> Self {
        Self::new(LogKind::Input, text)
    }
    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LogKind::Output, text)
    }
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LogKind::Error, text)
    }
}

/// Append-only ordered log of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<LogEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        tracing::trace!(
            target: "repl.log",
            kind = entry.kind.as_str(),
            len = entry.text.len(),
            index = self.entries.len(),
            "append"
        );
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Owned, detached copy of the session for observers that outlive a borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub editor: EditorState,
    pub log: Vec<LogEntry>,
}

/// One console session: editor buffer plus transcript.
#[derive(Debug, Clone, Default)]
pub struct Session {
    editor: LineBuffer,
    transcript: Transcript,
}

impl Session {
    /// Fresh session whose transcript starts with the banner as an `Output` entry.
    pub fn new(banner: impl Into<String>) -> Self {
        let mut transcript = Transcript::default();
        transcript.push(LogEntry::output(banner));
        Self {
            editor: LineBuffer::new(),
            transcript,
        }
    }

    /// Session with an empty transcript (no banner).
    pub fn without_banner() -> Self {
        Self::default()
    }

    pub fn editor(&self) -> &LineBuffer {
        &self.editor
    }

    /// Mutable buffer access for the router's edit and motion actions.
    pub fn editor_mut(&mut self) -> &mut LineBuffer {
        &mut self.editor
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            editor: self.editor.state(),
            log: self.transcript.entries().to_vec(),
        }
    }
}
