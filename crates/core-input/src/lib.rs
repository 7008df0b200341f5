//! Terminal input service: crossterm `EventStream` in, `core_events::Event` out.
//!
//! The service runs as one Tokio task. Keys are mapped to `InputEvent::Key`
//! (Ctrl-C surfaced as `InputEvent::CtrlC`), bracketed pastes are normalized to
//! `\n` line endings and streamed as `PasteStart`, `PasteChunk`.., `PasteEnd`.
//! Logs carry lengths and labels only, never typed or pasted text.

mod async_service;
mod key_token;
pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;

use core_events::Event;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}
