//! Rope-backed line buffer with a single insertion cursor.
//!
//! The buffer holds the text being composed before submission. It may contain
//! embedded newlines (multi-line composition) but is otherwise a flat sequence
//! of characters: the cursor is a char index (Unicode scalar values), never a
//! byte offset, so every operation stays on a character boundary.
//!
//! Invariant: `0 <= cursor <= len_chars()` after every operation. All
//! operations are total; out-of-range requests clamp instead of failing.
//!
//! Motions live in [`motion`]; text mutation lives here. Neither logs buffer
//! content, only lengths and cursor offsets.

use ropey::Rope;

pub mod motion;
pub mod newline;

pub use newline::{NormalizedText, normalize_line_endings};

/// Plain snapshot of the editable text and cursor, handed to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EditorState {
    pub text: String,
    pub cursor: usize,
}

impl EditorState {
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            cursor,
        }
    }

    /// Empty buffer with the cursor at the origin.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Editable text buffer backed by a `ropey::Rope` plus a char-indexed cursor.
#[derive(Clone, Default)]
pub struct LineBuffer {
    rope: Rope,
    cursor: usize,
}

impl std::fmt::Debug for LineBuffer {
    // Content is deliberately omitted; the buffer may hold arbitrary user input.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("len_chars", &self.rope.len_chars())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from a snapshot. An out-of-range cursor is clamped to the end.
    pub fn from_state(state: &EditorState) -> Self {
        let rope = Rope::from_str(&state.text);
        let cursor = state.cursor.min(rope.len_chars());
        Self { rope, cursor }
    }

    /// Current cursor position (char index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the text in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Owned copy of the full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Snapshot the buffer for observers.
    pub fn state(&self) -> EditorState {
        EditorState {
            text: self.text(),
            cursor: self.cursor,
        }
    }

    /// Splice `content` in at the cursor and advance the cursor past it.
    ///
    /// Used for single typed characters and for whole pastes alike; the
    /// inserted characters keep their source order and land contiguously.
    pub fn insert_at(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        let inserted = content.chars().count();
        self.rope.insert(self.cursor, content);
        let from = self.cursor;
        self.cursor += inserted;
        tracing::trace!(target: "text.edit", op = "insert", chars = inserted, from, to = self.cursor, "edit");
    }

    /// Insert a single character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        self.rope.insert_char(self.cursor, ch);
        self.cursor += 1;
        tracing::trace!(target: "text.edit", op = "insert_char", to = self.cursor, "edit");
    }

    /// Remove the char before the cursor. No-op at the start of the buffer.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.rope.remove(self.cursor - 1..self.cursor);
        self.cursor -= 1;
        tracing::trace!(target: "text.edit", op = "backspace", to = self.cursor, "edit");
        true
    }

    /// Remove the char under the cursor. No-op at the end of the buffer; the
    /// cursor never moves.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(self.cursor..self.cursor + 1);
        tracing::trace!(target: "text.edit", op = "delete", at = self.cursor, "edit");
        true
    }

    /// Reset to the empty buffer with the cursor at the origin.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.cursor = 0;
    }
}

impl From<&str> for LineBuffer {
    /// Buffer holding `text` with the cursor at the end.
    fn from(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let cursor = rope.len_chars();
        Self { rope, cursor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, cursor: usize) -> LineBuffer {
        LineBuffer::from_state(&EditorState::new(text, cursor))
    }

    #[test]
    fn insert_multi_char_mid_buffer() {
        let mut b = at("abc", 1);
        b.insert_at("XY");
        assert_eq!(b.state(), EditorState::new("aXYbc", 3));
    }

    #[test]
    fn insert_empty_is_noop() {
        let mut b = at("abc", 2);
        b.insert_at("");
        assert_eq!(b.state(), EditorState::new("abc", 2));
    }

    #[test]
    fn backspace_then_delete_at_end() {
        let mut b = at("abc", 3);
        assert!(b.backspace());
        assert_eq!(b.state(), EditorState::new("ab", 2));
        assert!(!b.delete());
        assert_eq!(b.state(), EditorState::new("ab", 2));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut b = at("abc", 0);
        assert!(!b.backspace());
        assert_eq!(b.state(), EditorState::new("abc", 0));
    }

    #[test]
    fn delete_keeps_cursor() {
        let mut b = at("abc", 1);
        assert!(b.delete());
        assert_eq!(b.state(), EditorState::new("ac", 1));
    }

    #[test]
    fn cursor_counts_chars_not_bytes() {
        let mut b = at("héllo", 2);
        b.insert_at("€");
        assert_eq!(b.state(), EditorState::new("hé€llo", 3));
        assert!(b.backspace());
        assert!(b.backspace());
        assert_eq!(b.state(), EditorState::new("hllo", 1));
    }

    #[test]
    fn from_state_clamps_cursor() {
        let b = at("ab", 40);
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn clear_resets_to_origin() {
        let mut b = LineBuffer::from("(+ 1 2)");
        b.clear();
        assert_eq!(b.state(), EditorState::empty());
        b.insert_at("x");
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn debug_omits_content() {
        let b = LineBuffer::from("secret");
        let dbg = format!("{b:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("len_chars"));
    }
}
