//! Terminal backend abstraction and crossterm implementation.
//!
//! The console runs in raw mode on the alternate screen so every keystroke
//! reaches the input service unprocessed and the renderer can redraw freely.
//! Leaving restores the user's shell screen; the guard guarantees that even
//! on early return or panic unwind.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
        size,
    },
};
use std::io::stdout;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
    fn is_entered(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }
}

/// Enter `backend` and return a guard that will leave on drop.
pub fn enter_guard<B: TerminalBackend>(backend: &mut B) -> Result<TerminalGuard<'_, B>> {
    backend.enter()?;
    Ok(TerminalGuard { backend })
}

impl<B: TerminalBackend> TerminalGuard<'_, B> {
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            // The renderer draws its own cursor; the hardware one stays hidden.
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
            tracing::debug!(target: "runtime", "terminal_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            tracing::debug!(target: "runtime", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(size()?)
    }

    fn is_entered(&self) -> bool {
        self.entered
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        entered: bool,
        enters: usize,
        leaves: usize,
    }

    impl TerminalBackend for FakeBackend {
        fn enter(&mut self) -> Result<()> {
            if !self.entered {
                self.entered = true;
                self.enters += 1;
            }
            Ok(())
        }
        fn leave(&mut self) -> Result<()> {
            if self.entered {
                self.entered = false;
                self.leaves += 1;
            }
            Ok(())
        }
        fn set_title(&mut self, _title: &str) -> Result<()> {
            Ok(())
        }
        fn size(&self) -> Result<(u16, u16)> {
            Ok((80, 24))
        }
        fn is_entered(&self) -> bool {
            self.entered
        }
    }

    #[test]
    fn guard_leaves_on_drop() {
        let mut backend = FakeBackend::default();
        {
            let mut guard = enter_guard(&mut backend).unwrap();
            assert!(guard.backend().is_entered());
        }
        assert!(!backend.entered);
        assert_eq!((backend.enters, backend.leaves), (1, 1));
    }

    #[test]
    fn guard_leave_is_idempotent_after_explicit_leave() {
        let mut backend = FakeBackend::default();
        {
            let mut guard = enter_guard(&mut backend).unwrap();
            guard.backend().leave().unwrap();
        }
        assert_eq!(backend.leaves, 1);
    }

    #[test]
    fn fresh_crossterm_backend_is_not_entered() {
        let backend = CrosstermBackend::new();
        assert!(!backend.is_entered());
    }
}
