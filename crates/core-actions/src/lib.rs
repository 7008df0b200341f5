//! Input routing: abstract events in, console actions out.
//!
//! Two stages, both free of hidden state:
//! * [`translate`] classifies one `InputEvent` into at most one `Action`;
//! * [`dispatcher::dispatch`] applies that action to an explicit `Session`.
//!
//! There are no modes. Every event is handled immediately against the current
//! buffer, and any event that yields an action is consumed by the router: the
//! host must not additionally apply platform behavior (e.g. native character
//! insertion) for it.

pub mod dispatcher;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{RouterConfig, translate};

/// Cursor motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Home,
    End,
}

/// Buffer mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// A single printable character.
    InsertChar(char),
    /// Multi-character content (paste or paste chunk).
    InsertText(String),
    Backspace,
    Delete,
}

/// Every operation the router can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    Edit(EditKind),
    /// Evaluate the buffer and record the round trip.
    Submit,
    /// Insert a literal newline without submitting.
    InsertNewline,
    /// Consumed with no effect (paste boundary markers).
    Noop,
}

impl Action {
    /// Discriminant label for logs; never includes inserted text.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Motion(MotionKind::Left) => "move_left",
            Action::Motion(MotionKind::Right) => "move_right",
            Action::Motion(MotionKind::Home) => "move_home",
            Action::Motion(MotionKind::End) => "move_end",
            Action::Edit(EditKind::InsertChar(_)) => "insert_char",
            Action::Edit(EditKind::InsertText(_)) => "insert_text",
            Action::Edit(EditKind::Backspace) => "backspace",
            Action::Edit(EditKind::Delete) => "delete",
            Action::Submit => "submit",
            Action::InsertNewline => "insert_newline",
            Action::Noop => "noop",
        }
    }
}
