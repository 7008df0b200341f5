//! Dispatcher applying an `Action` to an explicit `Session`.
//!
//! Sub-modules:
//! * `motion` - cursor movement
//! * `edit`   - buffer mutation (insert/backspace/delete)
//!
//! `Submit` and `InsertNewline` go straight to the `Session` operations.
//! Submit is the only action that suspends: the evaluator is awaited while `&mut Session` is held, which
//! serializes every later action behind the round trip.

use crate::Action;
use core_state::{Evaluator, Session, SubmitOutcome};

mod edit;
mod motion;

/// Result of dispatching (or declining) a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The router took ownership of the event; hosts must suppress any
    /// platform default behavior for it.
    pub consumed: bool,
    /// Session state changed and observers should redraw.
    pub dirty: bool,
    /// Set when the action was a submit.
    pub submitted: Option<SubmitOutcome>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            consumed: true,
            dirty: true,
            submitted: None,
        }
    }
    pub fn clean() -> Self {
        Self {
            consumed: true,
            dirty: false,
            submitted: None,
        }
    }
    /// Unrecognized event: not consumed, nothing changed.
    pub fn ignored() -> Self {
        Self {
            consumed: false,
            dirty: false,
            submitted: None,
        }
    }
    pub fn submitted(outcome: SubmitOutcome) -> Self {
        Self {
            consumed: true,
            dirty: true,
            submitted: Some(outcome),
        }
    }

    pub(crate) fn from_changed(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an action to the session.
pub async fn dispatch<E: Evaluator>(
    action: Action,
    session: &mut Session,
    evaluator: &E,
) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", action = action.label(), "dispatch");
    match action {
        Action::Motion(kind) => motion::handle_motion(kind, session),
        Action::Edit(kind) => edit::handle_edit(kind, session),
        Action::InsertNewline => {
            session.insert_newline();
            DispatchResult::dirty()
        }
        Action::Submit => DispatchResult::submitted(session.submit(evaluator).await),
        Action::Noop => DispatchResult::clean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditKind, MotionKind};
    use core_state::{EditorState, FnEvaluator, LogEntry};
    use pretty_assertions::assert_eq;

    fn echo() -> FnEvaluator<impl Fn(&str) -> anyhow::Result<String>> {
        FnEvaluator::new(|code: &str| Ok(code.to_string()))
    }

    #[tokio::test]
    async fn motion_at_boundary_is_clean() {
        let mut s = Session::without_banner();
        let r = dispatch(Action::Motion(MotionKind::Left), &mut s, &echo()).await;
        assert_eq!(r, DispatchResult::clean());
        assert!(r.consumed);
    }

    #[tokio::test]
    async fn insert_newline_action_goes_through_session() {
        let mut s = Session::new("banner");
        dispatch(Action::Edit(EditKind::InsertChar('a')), &mut s, &echo()).await;
        let r = dispatch(Action::InsertNewline, &mut s, &echo()).await;
        assert!(r.dirty);
        assert_eq!(s.editor().state(), EditorState::new("a\n", 2));
        assert_eq!(s.transcript().len(), 1);
    }

    #[tokio::test]
    async fn submit_reports_outcome() {
        let mut s = Session::without_banner();
        dispatch(Action::Edit(EditKind::InsertText("hi".into())), &mut s, &echo()).await;
        let r = dispatch(Action::Submit, &mut s, &echo()).await;
        assert_eq!(r.submitted, Some(SubmitOutcome::Output));
        assert_eq!(
            s.transcript().entries(),
            &[LogEntry::input("hi"), LogEntry::output("hi")]
        );
    }

    #[tokio::test]
    async fn noop_is_consumed_without_change() {
        let mut s = Session::new("banner");
        let r = dispatch(Action::Noop, &mut s, &echo()).await;
        assert!(r.consumed);
        assert!(!r.dirty);
    }
}
