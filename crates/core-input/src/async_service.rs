use crate::key_token::map_key_event;
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, CHANNEL_SENDS, Event, InputEvent, KEYPRESS_REPEAT,
    KEYPRESS_TOTAL, KeyEvent, PASTE_BYTES, PASTE_CHUNKS, PASTE_SESSIONS,
};
use core_text::normalize_line_endings;
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyEventKind as CKind, KeyModifiers as CMods,
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{debug, info, trace, warn};

pub(crate) const DEFAULT_PASTE_CAPACITY: usize = 4_096;

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task that forwards `EventStream` input into the runtime channel.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();

        if let Err(join_err) = task::spawn_blocking(enable_terminal_reporting).await {
            debug!(target: "input.paste", ?join_err, "enable_failed_join");
        }

        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;

        if let Err(join_err) = task::spawn_blocking(disable_terminal_reporting).await {
            debug!(target: "input.paste", ?join_err, "disable_failed_join");
        }
    });

    (handle, shutdown)
}

/// Bracketed paste delivers a paste as one `Event::Paste`; focus reporting
/// surfaces `FocusGained`/`FocusLost`.
fn enable_terminal_reporting() {
    if let Err(e) = crossterm::execute!(io::stdout(), EnableBracketedPaste, EnableFocusChange) {
        debug!(target: "input.paste", ?e, "enable_failed");
    }
}

fn disable_terminal_reporting() {
    if let Err(e) = crossterm::execute!(io::stdout(), DisableBracketedPaste, DisableFocusChange) {
        debug!(target: "input.paste", ?e, "disable_failed");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            exit_reason: ExitReason::Running,
            stream_error: None,
        }
    }

    pub async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let keep_going = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(Event::Input(InputEvent::Resize(w, h))).await
                }
                Ok(CEvent::Paste(data)) => self.handle_paste(data).await,
                Ok(CEvent::FocusGained) => {
                    trace!(target: "input.event", "focus_gained");
                    self.send_event(Event::Input(InputEvent::FocusGained)).await
                }
                Ok(CEvent::FocusLost) => {
                    trace!(target: "input.event", "focus_lost");
                    self.send_event(Event::Input(InputEvent::FocusLost)).await
                }
                Ok(CEvent::Mouse(_)) => true,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    false
                }
            };
            if !keep_going {
                break;
            }
        }

        let reason = match self.exit_reason {
            ExitReason::Running => ExitReason::StreamEnded,
            other => other,
        };

        match reason {
            ExitReason::ShutdownSignal => {
                ASYNC_INPUT_STOP_SIGNAL.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::ChannelClosed => {
                ASYNC_INPUT_STOP_CHANNEL.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::StreamEnded => {
                ASYNC_INPUT_STOP_STREAM.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::StreamError => {
                ASYNC_INPUT_STOP_ERROR.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::Running => {}
        }

        if matches!(reason, ExitReason::StreamError) {
            if let Some(kind) = self.stream_error {
                warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
            } else {
                warn!(target: "input.thread", "async_input_task_stream_error");
            }
        }

        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        if !matches!(key.kind, CKind::Press | CKind::Repeat) {
            return true;
        }

        if matches!(key.code, CKeyCode::Char('c')) && key.modifiers.contains(CMods::CONTROL) {
            return self.send_event(Event::Input(InputEvent::CtrlC)).await;
        }

        match map_key_event(&key) {
            Some(mapped) => self.emit_keypress(mapped).await,
            None => true,
        }
    }

    /// Normalize line endings, then stream the paste as start/chunks/end so a
    /// large paste never has to cross the channel as one message.
    async fn handle_paste(&mut self, data: String) -> bool {
        let text = normalize_line_endings(&data);
        trace!(
            target: "input.paste",
            len = text.normalized.len(),
            mixed_line_endings = text.mixed,
            "paste_event"
        );
        if !self.send_event(Event::Input(InputEvent::PasteStart)).await {
            return false;
        }
        PASTE_SESSIONS.fetch_add(1, Ordering::Relaxed);

        let mut remaining = text.normalized.as_str();
        while !remaining.is_empty() {
            let (chunk, rest) = split_utf8_chunk(remaining);
            if chunk.is_empty() {
                break;
            }
            trace!(target: "input.paste", chunk_len = chunk.len(), "chunk_flush");
            if !self
                .send_event(Event::Input(InputEvent::PasteChunk(chunk.to_string())))
                .await
            {
                return false;
            }
            PASTE_CHUNKS.fetch_add(1, Ordering::Relaxed);
            PASTE_BYTES.fetch_add(chunk.len() as u64, Ordering::Relaxed);
            remaining = rest;
        }

        trace!(target: "input.paste", "paste_event_end");
        self.send_event(Event::Input(InputEvent::PasteEnd)).await
    }

    async fn emit_keypress(&mut self, key: KeyEvent) -> bool {
        trace!(
            target: "input.event",
            kind = "keypress",
            repeat = key.repeat,
            mods = ?key.mods,
            code_kind = code_kind_label(&key)
        );

        let repeat = key.repeat;
        let sent = self.send_event(Event::Input(InputEvent::Key(key))).await;
        if sent {
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
            if repeat {
                KEYPRESS_REPEAT.fetch_add(1, Ordering::Relaxed);
            }
        }
        sent
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(_) => {
                CHANNEL_SENDS.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                if !matches!(self.exit_reason, ExitReason::ShutdownSignal) {
                    self.exit_reason = ExitReason::ChannelClosed;
                }
                false
            }
        }
    }
}

/// Keypress logs carry the key class only; a char code would leak typed text.
fn code_kind_label(key: &KeyEvent) -> &'static str {
    match key.code {
        core_events::KeyCode::Char(_) => "char",
        _ => "named",
    }
}

pub(crate) fn split_utf8_chunk(input: &str) -> (&str, &str) {
    if input.len() <= DEFAULT_PASTE_CAPACITY {
        return (input, "");
    }

    let mut idx = DEFAULT_PASTE_CAPACITY;
    while idx > 0 && !input.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return (input, "");
    }

    input.split_at(idx)
}
