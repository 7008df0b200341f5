//! Core event types consumed by the console runtime.
//!
//! Key and paste events arrive here already abstracted from the terminal: the
//! delivery layer (`core-input`) maps platform events into this taxonomy and the
//! router (`core-actions`) decides what each one means.

use std::sync::atomic::AtomicU64;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// One bounded mpsc channel carries every event from the input task to the runtime loop. The loop
// handles one event at a time and awaits any in-flight evaluation before receiving the next, so
// keystrokes typed while an evaluation runs queue here instead of interleaving with it. The input
// task uses `send().await` and therefore parks under backpressure rather than dropping keys.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 8192;

// Telemetry counters (relaxed atomics, read by tests and logged at shutdown).
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static CHANNEL_SENDS: AtomicU64 = AtomicU64::new(0);
pub static PASTE_SESSIONS: AtomicU64 = AtomicU64::new(0);
pub static PASTE_CHUNKS: AtomicU64 = AtomicU64::new(0);
pub static PASTE_BYTES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_REPEAT: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Command(CommandEvent),
    Shutdown,
}

/// Host-level commands that bypass the input router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEvent {
    Quit,
    /// Explicit "clear console": wipes buffer and transcript.
    ClearConsole,
}

/// Abstract input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press (or auto-repeat) with its modifiers.
    Key(KeyEvent),
    /// A complete paste delivered in one piece.
    Paste(String),
    /// Start of a streamed paste. Chunks follow in order, then `PasteEnd`.
    PasteStart,
    /// One in-order piece of a streamed paste. Never log the payload, only its length.
    PasteChunk(String),
    PasteEnd,
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Ctrl-C surfaced distinctly so the host can treat it as an interrupt.
    CtrlC,
    FocusGained,
    FocusLost,
}

impl InputEvent {
    /// Short discriminant label for logs (never includes payloads).
    pub fn kind_label(&self) -> &'static str {
        match self {
            InputEvent::Key(_) => "key",
            InputEvent::Paste(_) => "paste",
            InputEvent::PasteStart => "paste_start",
            InputEvent::PasteChunk(_) => "paste_chunk",
            InputEvent::PasteEnd => "paste_end",
            InputEvent::Resize(..) => "resize",
            InputEvent::CtrlC => "ctrl_c",
            InputEvent::FocusGained => "focus_gained",
            InputEvent::FocusLost => "focus_lost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    /// Auto-repeat reported by the terminal; never synthesized downstream.
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            repeat: false,
        }
    }

    /// Unmodified key press.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// Normalized logical key identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
        const SUPER = 0b0001_0000;
    }
}
