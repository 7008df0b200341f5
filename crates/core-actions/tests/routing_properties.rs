//! Randomized event streams through translate + dispatch.

use core_actions::{RouterConfig, dispatch, translate};
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use core_state::{FnEvaluator, LogKind, Session};
use proptest::prelude::*;

fn mods_strategy() -> impl Strategy<Value = KeyModifiers> {
    (0u8..32).prop_map(KeyModifiers::from_bits_truncate)
}

fn code_strategy() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        "[a-z(); λ]".prop_map(|s| KeyCode::Char(s.chars().next().unwrap_or('a'))),
        Just(KeyCode::Enter),
        Just(KeyCode::Backspace),
        Just(KeyCode::Delete),
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Home),
        Just(KeyCode::End),
        Just(KeyCode::Tab),
        Just(KeyCode::Up),
        Just(KeyCode::Esc),
    ]
}

fn event_strategy() -> impl Strategy<Value = InputEvent> {
    prop_oneof![
        6 => (code_strategy(), mods_strategy())
            .prop_map(|(code, mods)| InputEvent::Key(KeyEvent::new(code, mods))),
        1 => "[a-z\\n ]{0,6}".prop_map(InputEvent::Paste),
        1 => "[a-z\\n ]{1,6}".prop_map(InputEvent::PasteChunk),
        1 => Just(InputEvent::PasteStart),
        1 => Just(InputEvent::PasteEnd),
        1 => Just(InputEvent::Resize(80, 24)),
        1 => Just(InputEvent::FocusGained),
    ]
}

fn run(events: &[InputEvent]) -> Result<(), TestCaseError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let evaluator = FnEvaluator::new(|code: &str| -> anyhow::Result<usize> { Ok(code.len()) });
    let cfg = RouterConfig::default();
    let mut session = Session::new("banner");

    for ev in events {
        let before = session.snapshot();
        match translate(ev, &cfg) {
            Some(action) => {
                let submitting = matches!(action, core_actions::Action::Submit);
                let r = rt.block_on(dispatch(action, &mut session, &evaluator));
                prop_assert!(r.consumed);
                if submitting {
                    let log = session.transcript().entries();
                    prop_assert_eq!(log.len(), before.log.len() + 2);
                    prop_assert_eq!(log[log.len() - 2].kind, LogKind::Input);
                    prop_assert_eq!(&log[log.len() - 2].text, &before.editor.text);
                    prop_assert_eq!(log[log.len() - 1].kind, LogKind::Output);
                    prop_assert!(session.editor().is_empty());
                } else {
                    prop_assert_eq!(session.transcript().len(), before.log.len());
                }
                if !r.dirty {
                    prop_assert_eq!(session.snapshot(), before);
                }
            }
            None => prop_assert_eq!(session.snapshot(), before),
        }
        prop_assert!(session.editor().cursor() <= session.editor().len_chars());
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_streams_preserve_invariants(events in prop::collection::vec(event_strategy(), 0..60)) {
        run(&events)?;
    }
}
