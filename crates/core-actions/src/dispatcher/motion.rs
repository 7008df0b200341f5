//! Motion sub-dispatch (cursor movement). Pure cursor changes; the text is
//! never touched.

use super::DispatchResult;
use crate::MotionKind;
use core_state::Session;

pub(crate) fn handle_motion(kind: MotionKind, session: &mut Session) -> DispatchResult {
    let buf = session.editor_mut();
    let before = buf.cursor();
    let moved = match kind {
        MotionKind::Left => buf.move_left(),
        MotionKind::Right => buf.move_right(),
        MotionKind::Home => buf.move_home(),
        MotionKind::End => buf.move_end(),
    };
    tracing::trace!(target: "actions.dispatch", op = "motion", ?kind, from = before, to = buf.cursor(), moved, "motion");
    DispatchResult::from_changed(moved)
}
