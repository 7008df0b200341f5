//! repline entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::RouterConfig;
use core_events::{
    ASYNC_INPUT_STARTS, CHANNEL_SEND_FAILURES, CHANNEL_SENDS, CommandEvent, EVENT_CHANNEL_CAP,
    Event, InputEvent, KEYPRESS_REPEAT, KEYPRESS_TOTAL, KeyCode, KeyModifiers, PASTE_BYTES,
    PASTE_CHUNKS, PASTE_SESSIONS,
};
use core_model::Console;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard, enter_guard};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod evaluator;
mod focus;
mod render;

use evaluator::HostEvaluator;
use focus::TerminalFocus;

const LOG_FILE_NAME: &str = "repline.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "repline", version, about = "Terminal REPL console")]
struct Args {
    /// Configuration file path (overrides discovery of `repline.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Greeting shown as the first transcript entry.
    #[arg(long = "banner")]
    banner: Option<String>,
    /// Evaluator command and arguments, e.g. `repline -- python3 -q`.
    #[arg(last = true)]
    command: Vec<String>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    console: Console<HostEvaluator, TerminalFocus>,
    focus: TerminalFocus,
    prompt: String,
    terminal_guard: TerminalGuard<'a, CrosstermBackend>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let mut config = core_config::load_from(args.config.clone())?;
        config.override_banner(args.banner.clone());
        config.override_command(args.command.clone());

        let evaluator = HostEvaluator::from_config(&config.file.evaluator);
        let router = RouterConfig::from(&config.file.input);
        info!(
            target: "runtime.startup",
            config_source = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
            evaluator = evaluator.kind_label(),
            timeout_ms = config.file.evaluator.timeout_ms,
            "bootstrap_complete"
        );

        self.backend.set_title("repline")?;
        let terminal_guard = enter_guard(&mut self.backend)?;

        // Created after entering the terminal so the initial focus is visible.
        let focus = TerminalFocus::new();
        let console = Console::with_parts(
            evaluator,
            focus.clone(),
            config.file.console.banner.clone(),
            router,
        );

        Ok(RuntimeContext {
            console,
            focus,
            prompt: config.file.console.prompt,
            terminal_guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

enum LoopControl {
    Continue { redraw: bool },
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    EndOfInput,
    CommandQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::EndOfInput => "end_of_input",
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-level keys handled before the router sees the event: Ctrl-C quits,
/// Ctrl-D quits on an empty buffer, Ctrl-L clears the console.
fn host_command(input: &InputEvent, buffer_empty: bool) -> Option<CommandEvent> {
    match input {
        InputEvent::CtrlC => Some(CommandEvent::Quit),
        InputEvent::Key(key) if key.mods.contains(KeyModifiers::CTRL) => match key.code {
            KeyCode::Char('d' | 'D') if buffer_empty => Some(CommandEvent::Quit),
            KeyCode::Char('l' | 'L') => Some(CommandEvent::ClearConsole),
            _ => None,
        },
        _ => None,
    }
}

struct ConsoleRuntime<'a> {
    console: Console<HostEvaluator, TerminalFocus>,
    focus: TerminalFocus,
    prompt: String,
    rx: mpsc::Receiver<Event>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    terminal_guard: TerminalGuard<'a, CrosstermBackend>,
}

impl<'a> ConsoleRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
    ) -> Self {
        let RuntimeContext {
            console,
            focus,
            prompt,
            terminal_guard,
        } = context;
        Self {
            console,
            focus,
            prompt,
            rx,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            terminal_guard,
        }
    }

    /// One event at a time: a submit is awaited to completion before the next
    /// event leaves the channel, so keys typed during evaluation queue up.
    async fn run(&mut self) -> Result<()> {
        self.render();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.handle_input_event(input).await,
                Event::Command(cmd) => self.handle_command_event(*cmd, ShutdownReason::CommandQuit),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };

            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { redraw } => {
                    if redraw {
                        self.render();
                    }
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    async fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        let buffer_empty = self.console.state().editor().is_empty();
        if let Some(cmd) = host_command(input, buffer_empty) {
            let reason = if matches!(input, InputEvent::CtrlC) {
                ShutdownReason::CtrlC
            } else {
                ShutdownReason::EndOfInput
            };
            return self.handle_command_event(cmd, reason);
        }

        match input {
            InputEvent::FocusGained => {
                self.console.focus();
                LoopControl::Continue { redraw: true }
            }
            InputEvent::FocusLost => {
                self.console.blur();
                LoopControl::Continue { redraw: true }
            }
            InputEvent::Resize(w, h) => {
                trace!(target: "runtime", w, h, "resize");
                LoopControl::Continue { redraw: true }
            }
            other => {
                let result = self.console.on_editor_event(other).await;
                if let Some(outcome) = result.submitted {
                    trace!(target: "runtime", ?outcome, "submit_settled");
                }
                LoopControl::Continue {
                    redraw: result.dirty,
                }
            }
        }
    }

    fn handle_command_event(&mut self, cmd: CommandEvent, reason: ShutdownReason) -> LoopControl {
        match cmd {
            CommandEvent::Quit => LoopControl::Break { reason },
            CommandEvent::ClearConsole => {
                self.console.clear_all();
                LoopControl::Continue { redraw: true }
            }
        }
    }

    fn render(&mut self) {
        let rows = match self.terminal_guard.backend().size() {
            Ok((_, h)) => usize::from(h),
            Err(e) => {
                warn!(target: "runtime.render", ?e, "size_query_failed");
                24
            }
        };
        let frame = render::build_frame(
            self.console.state(),
            &self.prompt,
            self.focus.cursor_visible(),
            rows,
        );
        if let Err(e) = render::draw(&mut std::io::stdout(), &frame) {
            error!(target: "runtime.render", ?e, "draw_failed");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", reason = reason.as_str(), "shutdown_begin");

        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(target: "runtime.shutdown", "input_task_joined"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", "input_task_cancelled")
                }
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "input_task_join_failed"),
                Err(_) => warn!(target: "runtime.shutdown", "input_task_join_timeout"),
            }
        }

        info!(
            target: "runtime.shutdown",
            reason = reason.as_str(),
            transcript_entries = self.console.state().transcript().len(),
            keypresses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
            key_repeats = KEYPRESS_REPEAT.load(Ordering::Relaxed),
            paste_sessions = PASTE_SESSIONS.load(Ordering::Relaxed),
            paste_chunks = PASTE_CHUNKS.load(Ordering::Relaxed),
            paste_bytes = PASTE_BYTES.load(Ordering::Relaxed),
            channel_sends = CHANNEL_SENDS.load(Ordering::Relaxed),
            channel_send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            input_starts = ASYNC_INPUT_STARTS.load(Ordering::Relaxed),
            "shutdown_complete"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);

    let mut runtime = ConsoleRuntime::new(context, rx, input_task, input_shutdown);
    runtime.run().await
}
