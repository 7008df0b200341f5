//! Evaluators the binary can plug into the console.
//!
//! With no `[evaluator] command` configured the console echoes its input.
//! Otherwise each submit spawns the command, writes the buffer to its stdin
//! and waits for it to exit.

use core_config::EvaluatorConfig;
use core_state::Evaluator;
use core_text::normalize_line_endings;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::string::FromUtf8Error;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Failure modes of a process-backed evaluation. The `Display` text is what
/// lands in the transcript.
#[derive(Debug, Error)]
pub enum EvalProcessError {
    #[error("no evaluator command configured")]
    EmptyCommand,
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("evaluator I/O failed: {0}")]
    Io(#[from] io::Error),
    /// Non-zero exit; carries the trimmed stderr.
    #[error("{0}")]
    Failed(String),
    /// Non-zero exit with nothing on stderr.
    #[error("evaluator failed ({0})")]
    Exit(ExitStatus),
    #[error("evaluation timed out after {0}ms")]
    Timeout(u128),
    #[error("evaluator produced non-UTF-8 output")]
    NonUtf8(#[from] FromUtf8Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoEvaluator;

impl Evaluator for EchoEvaluator {
    type Output = String;

    async fn evaluate(&self, code: &str) -> anyhow::Result<String> {
        Ok(code.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ProcessEvaluator {
    command: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessEvaluator {
    pub fn new(command: Vec<String>, timeout: Option<Duration>) -> Self {
        Self { command, timeout }
    }

    pub async fn run(&self, code: &str) -> Result<String, EvalProcessError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(EvalProcessError::EmptyCommand)?;
        let started = Instant::now();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EvalProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        let input = code.as_bytes().to_vec();
        let stdin = child.stdin.take();
        // Stdin is fed while stdout and stderr drain; dropping it closes the pipe.
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&input).await {
                    // A child that exits without reading its input is not an error.
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let exchange = async move {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        // On timeout `exchange` is dropped with the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| EvalProcessError::Timeout(limit.as_millis()))??,
            None => exchange.await?,
        };

        tracing::debug!(
            target: "repl.eval",
            program = program.as_str(),
            status = ?output.status.code(),
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "process_exited"
        );

        if output.status.success() {
            let stdout = String::from_utf8(output.stdout)?;
            let mut text = normalize_line_endings(&stdout).normalized;
            if text.ends_with('\n') {
                text.pop();
            }
            Ok(text)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = normalize_line_endings(&stderr).normalized;
            let message = message.trim();
            if message.is_empty() {
                Err(EvalProcessError::Exit(output.status))
            } else {
                Err(EvalProcessError::Failed(message.to_string()))
            }
        }
    }
}

impl Evaluator for ProcessEvaluator {
    type Output = String;

    async fn evaluate(&self, code: &str) -> anyhow::Result<String> {
        Ok(self.run(code).await?)
    }
}

/// The evaluator selected from configuration at startup.
#[derive(Debug, Clone)]
pub enum HostEvaluator {
    Echo(EchoEvaluator),
    Process(ProcessEvaluator),
}

impl HostEvaluator {
    pub fn from_config(cfg: &EvaluatorConfig) -> Self {
        if cfg.command.is_empty() {
            HostEvaluator::Echo(EchoEvaluator)
        } else {
            HostEvaluator::Process(ProcessEvaluator::new(cfg.command.clone(), cfg.timeout()))
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            HostEvaluator::Echo(_) => "echo",
            HostEvaluator::Process(_) => "process",
        }
    }
}

impl Evaluator for HostEvaluator {
    type Output = String;

    async fn evaluate(&self, code: &str) -> anyhow::Result<String> {
        match self {
            HostEvaluator::Echo(e) => e.evaluate(code).await,
            HostEvaluator::Process(p) => p.evaluate(code).await,
        }
    }
}
