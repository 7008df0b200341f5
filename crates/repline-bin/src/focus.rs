use core_model::FocusTarget;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Focus target for the terminal: focus decides whether the renderer draws
/// the cursor cell. Clones share one flag, so the runtime keeps a clone for
/// rendering while the console owns the other.
#[derive(Debug, Clone, Default)]
pub struct TerminalFocus {
    visible: Arc<AtomicBool>,
}

impl TerminalFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }
}

impl FocusTarget for TerminalFocus {
    fn focus(&mut self) {
        self.visible.store(true, Ordering::Relaxed);
        tracing::trace!(target: "runtime", "focus");
    }

    fn blur(&mut self) {
        self.visible.store(false, Ordering::Relaxed);
        tracing::trace!(target: "runtime", "blur");
    }
}
