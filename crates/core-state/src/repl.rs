//! The REPL round trip: submit, newline insertion and clearing.
//!
//! Ordering contract for `submit`:
//! 1. the `Input` entry is appended before the evaluator is awaited;
//! 2. exactly one `Output` or `Error` entry follows once evaluation settles;
//! 3. the buffer resets to empty only after that append.
//!
//! `submit` holds `&mut Session` across the evaluator await, so no other
//! mutation can be observed between these steps. If the future is dropped
//! mid-evaluation only step 1 has happened and the buffer keeps its text.

use crate::{LogEntry, Session, eval::Evaluator};
use tracing::Instrument;

/// Which completion entry a submit produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Output,
    Error,
}

impl Session {
    /// Evaluate the current buffer and record the round trip in the transcript.
    ///
    /// Evaluation failures are recovered here and never propagate: they become
    /// an `Error` entry carrying the failure's message.
    pub async fn submit<E: Evaluator>(&mut self, evaluator: &E) -> SubmitOutcome {
        let line = self.editor.text();
        let span = tracing::debug_span!(
            target: "repl.submit",
            "submit",
            input_chars = self.editor.len_chars(),
            log_index = self.transcript.len()
        );
        async move {
            self.transcript.push(LogEntry::input(line.as_str()));
            let outcome = match evaluator.evaluate(&line).await {
                Ok(value) => {
                    let text = value.to_string();
                    tracing::debug!(target: "repl.submit", output_len = text.len(), "submit_ok");
                    self.transcript.push(LogEntry::output(text));
                    SubmitOutcome::Output
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::debug!(target: "repl.submit", message_len = message.len(), "submit_error");
                    self.transcript.push(LogEntry::error(message));
                    SubmitOutcome::Error
                }
            };
            self.editor.clear();
            outcome
        }
        .instrument(span)
        .await
    }

    /// Insert a literal newline at the cursor without submitting.
    pub fn insert_newline(&mut self) {
        self.editor.insert_char('\n');
    }

    /// Reset both the buffer and the transcript to empty.
    pub fn clear_all(&mut self) {
        tracing::debug!(target: "repl.submit", dropped_entries = self.transcript.len(), "clear_all");
        self.editor.clear();
        self.transcript.clear();
    }
}
