//! Text edit action handling (insert/backspace/delete).
//!
//! All mutation goes through `core_text::LineBuffer`, which keeps the cursor
//! inside `[0, len]`. Logs carry lengths and offsets only.

use super::DispatchResult;
use crate::EditKind;
use core_state::Session;

pub(crate) fn handle_edit(kind: EditKind, session: &mut Session) -> DispatchResult {
    let buf = session.editor_mut();
    let before = buf.cursor();
    let (op, changed) = match kind {
        EditKind::InsertChar(ch) => {
            buf.insert_char(ch);
            ("insert_char", true)
        }
        EditKind::InsertText(text) => {
            buf.insert_at(&text);
            ("insert_text", !text.is_empty())
        }
        EditKind::Backspace => ("backspace", buf.backspace()),
        EditKind::Delete => ("delete", buf.delete()),
    };
    tracing::trace!(target: "actions.dispatch", op, from = before, to = buf.cursor(), changed, "edit");
    DispatchResult::from_changed(changed)
}
