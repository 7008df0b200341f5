use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into a console key event.
///
/// Returns `None` for releases and for key codes the console has no use for
/// (media keys, lock keys, bare modifiers).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    let repeat = matches!(event.kind, CKeyEventKind::Repeat);
    Some(KeyEvent::new(code, map_mods(event.modifiers)).with_repeat(repeat))
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Insert => KeyCode::Insert,
        CKeyCode::F(n) => KeyCode::F(*n),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(code)
}

pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if mods.contains(CKeyModifiers::SUPER) {
        out |= KeyModifiers::SUPER;
    }
    if mods.contains(CKeyModifiers::META) {
        out |= KeyModifiers::META;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    #[test]
    fn maps_plain_char() {
        let ev = key_event(
            CKeyCode::Char('a'),
            CKeyModifiers::NONE,
            CKeyEventKind::Press,
        );
        let key = map_key_event(&ev).expect("char should map");
        assert_eq!(key.code, KeyCode::Char('a'));
        assert!(key.mods.is_empty());
        assert!(!key.repeat);
    }

    #[test]
    fn shift_enter_keeps_modifier() {
        let ev = key_event(CKeyCode::Enter, CKeyModifiers::SHIFT, CKeyEventKind::Press);
        let key = map_key_event(&ev).expect("enter should map");
        assert_eq!(key.code, KeyCode::Enter);
        assert_eq!(key.mods, KeyModifiers::SHIFT);
    }

    #[test]
    fn combines_modifier_bits() {
        let ev = key_event(
            CKeyCode::Char('d'),
            CKeyModifiers::CONTROL | CKeyModifiers::ALT | CKeyModifiers::META,
            CKeyEventKind::Press,
        );
        let key = map_key_event(&ev).expect("chord should map");
        assert_eq!(
            key.mods,
            KeyModifiers::CTRL | KeyModifiers::ALT | KeyModifiers::META
        );
    }

    #[test]
    fn back_tab_collapses_to_tab() {
        assert_eq!(map_key_code(&CKeyCode::BackTab), Some(KeyCode::Tab));
        assert_eq!(map_key_code(&CKeyCode::F(7)), Some(KeyCode::F(7)));
    }

    #[test]
    fn release_and_unsupported_keys_are_skipped() {
        let release = key_event(
            CKeyCode::Char('x'),
            CKeyModifiers::NONE,
            CKeyEventKind::Release,
        );
        assert!(map_key_event(&release).is_none());
        let caps = key_event(CKeyCode::CapsLock, CKeyModifiers::NONE, CKeyEventKind::Press);
        assert!(map_key_event(&caps).is_none());
    }

    #[test]
    fn repeat_kind_sets_flag() {
        let ev = key_event(
            CKeyCode::Backspace,
            CKeyModifiers::NONE,
            CKeyEventKind::Repeat,
        );
        let key = map_key_event(&ev).expect("repeat should map");
        assert!(key.repeat);
    }
}
