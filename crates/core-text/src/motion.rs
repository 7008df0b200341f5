//! Cursor motions.
//!
//! Motions never touch the text; they only move the cursor and clamp it into
//! `[0, len_chars]`. Each returns `true` when the cursor actually moved so
//! callers can skip redundant redraws.

use crate::LineBuffer;

impl LineBuffer {
    /// Move one char left, stopping at the origin.
    pub fn move_left(&mut self) -> bool {
        let before = self.cursor;
        self.cursor = self.cursor.saturating_sub(1);
        self.moved(before, "left")
    }

    /// Move one char right, stopping at the end of the text.
    pub fn move_right(&mut self) -> bool {
        let before = self.cursor;
        self.cursor = (self.cursor + 1).min(self.rope.len_chars());
        self.moved(before, "right")
    }

    /// Jump to the start of the buffer.
    pub fn move_home(&mut self) -> bool {
        let before = self.cursor;
        self.cursor = 0;
        self.moved(before, "home")
    }

    /// Jump to the end of the buffer.
    pub fn move_end(&mut self) -> bool {
        let before = self.cursor;
        self.cursor = self.rope.len_chars();
        self.moved(before, "end")
    }

    fn moved(&self, before: usize, kind: &'static str) -> bool {
        tracing::trace!(target: "text.edit", op = "motion", kind, from = before, to = self.cursor, "motion");
        before != self.cursor
    }
}
