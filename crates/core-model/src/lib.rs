//! Console model: the single entry point hosts talk to.
//!
//! A `Console` bundles one `Session` with the two capabilities the host
//! injects: an `Evaluator` and a `FocusTarget`. Hosts feed it raw events via
//! [`Console::on_editor_event`] and read state back via [`Console::state`]
//! (borrowed) or [`Console::snapshot`] (owned) after each call completes.
//!
//! Serialization: `on_editor_event` takes `&mut self` and, for a submit, holds
//! that borrow until the evaluator settles. A host that awaits each call
//! before delivering the next event therefore queues input typed during an
//! evaluation instead of interleaving it.
//!
//! Invariants:
//! * The session is only mutated through the router (`core-actions`) or the
//!   explicit [`Console::clear_all`] action.
//! * The console keeps no focus flag; focus changes are forwarded as-is.

use core_actions::{DispatchResult, RouterConfig, dispatch, translate};
use core_events::InputEvent;
use core_state::{Evaluator, Session, SessionSnapshot};

mod focus;
pub use focus::{FocusTarget, NoopFocus};

pub struct Console<E, F = NoopFocus> {
    session: Session,
    evaluator: E,
    focus: F,
    router: RouterConfig,
}

impl<E: Evaluator> Console<E, NoopFocus> {
    /// Console with default routing and no focus management.
    pub fn new(evaluator: E, banner: impl Into<String>) -> Self {
        Self::with_parts(evaluator, NoopFocus, banner, RouterConfig::default())
    }
}

impl<E: Evaluator, F: FocusTarget> Console<E, F> {
    /// Build a console and take focus once, as a freshly mounted console does.
    pub fn with_parts(
        evaluator: E,
        focus: F,
        banner: impl Into<String>,
        router: RouterConfig,
    ) -> Self {
        let mut console = Self {
            session: Session::new(banner),
            evaluator,
            focus,
            router,
        };
        console.focus();
        tracing::debug!(target: "console", newline_mods = ?router.newline_mods, "console_created");
        console
    }

    /// Route one raw input event. Unrecognized events are dropped silently and
    /// reported as not consumed.
    pub async fn on_editor_event(&mut self, event: &InputEvent) -> DispatchResult {
        match translate(event, &self.router) {
            Some(action) => dispatch(action, &mut self.session, &self.evaluator).await,
            None => {
                tracing::trace!(target: "actions.dispatch", event = event.kind_label(), "unrouted");
                DispatchResult::ignored()
            }
        }
    }

    /// Borrowed read-only view of the session.
    pub fn state(&self) -> &Session {
        &self.session
    }

    /// Owned copy of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Explicit "clear console": empties buffer and transcript.
    pub fn clear_all(&mut self) {
        self.session.clear_all();
    }

    pub fn focus(&mut self) {
        self.focus.focus();
    }

    pub fn blur(&mut self) {
        self.focus.blur();
    }
}
