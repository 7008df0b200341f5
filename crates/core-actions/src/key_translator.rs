//! Event -> Action classification.
//!
//! The translator is a pure function of the event and the (static) router
//! configuration. Dispatch table:
//!
//! | Event                          | Action                      |
//! |--------------------------------|-----------------------------|
//! | Left / Right / Home / End      | `Motion(..)`                |
//! | Backspace / Delete             | `Edit(Backspace / Delete)`  |
//! | Enter, no modifiers            | `Submit`                    |
//! | Enter + a newline modifier     | `InsertNewline`             |
//! | printable char (no Ctrl/Alt)   | `Edit(InsertChar)`          |
//! | `Paste` / `PasteChunk`         | `Edit(InsertText)`          |
//! | `PasteStart` / `PasteEnd`      | `Noop` (consumed)           |
//!
//! Anything else is unrecognized and yields `None`; the caller drops it.

use crate::{Action, EditKind, MotionKind};
use core_config::{InputConfig, ModifierName};
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};

/// Static routing policy derived from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Enter combined with any of these modifiers inserts a newline.
    pub newline_mods: KeyModifiers,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            newline_mods: KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CTRL,
        }
    }
}

impl From<&InputConfig> for RouterConfig {
    fn from(cfg: &InputConfig) -> Self {
        let newline_mods = cfg
            .newline_modifiers
            .iter()
            .fold(KeyModifiers::empty(), |acc, m| acc | modifier_bit(*m));
        Self { newline_mods }
    }
}

fn modifier_bit(m: ModifierName) -> KeyModifiers {
    match m {
        ModifierName::Shift => KeyModifiers::SHIFT,
        ModifierName::Alt => KeyModifiers::ALT,
        ModifierName::Ctrl => KeyModifiers::CTRL,
        ModifierName::Meta => KeyModifiers::META,
        ModifierName::Super => KeyModifiers::SUPER,
    }
}

/// Classify one input event.
pub fn translate(event: &InputEvent, cfg: &RouterConfig) -> Option<Action> {
    match event {
        InputEvent::Key(key) => translate_key(key, cfg),
        InputEvent::Paste(text) | InputEvent::PasteChunk(text) => {
            Some(Action::Edit(EditKind::InsertText(text.clone())))
        }
        InputEvent::PasteStart | InputEvent::PasteEnd => Some(Action::Noop),
        InputEvent::Resize(..)
        | InputEvent::CtrlC
        | InputEvent::FocusGained
        | InputEvent::FocusLost => None,
    }
}

fn translate_key(key: &KeyEvent, cfg: &RouterConfig) -> Option<Action> {
    let action = match key.code {
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Home => Action::Motion(MotionKind::Home),
        KeyCode::End => Action::Motion(MotionKind::End),
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Delete => Action::Edit(EditKind::Delete),
        KeyCode::Enter if key.mods.is_empty() => Action::Submit,
        KeyCode::Enter if key.mods.intersects(cfg.newline_mods) => Action::InsertNewline,
        KeyCode::Char(c) if is_printable(c, key.mods) => Action::Edit(EditKind::InsertChar(c)),
        _ => return None,
    };
    Some(action)
}

fn is_printable(c: char, mods: KeyModifiers) -> bool {
    !c.is_control() && !mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
}
