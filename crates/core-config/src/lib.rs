//! Configuration loading and parsing.
//!
//! Parses `repline.toml` (or an override path provided by the binary). Every
//! section and field is optional; anything absent takes its default. Unknown
//! fields are ignored so older binaries keep reading newer files. A file that
//! fails to parse is reported at `warn` and replaced by defaults rather than
//! aborting startup.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "repline.toml";

pub const DEFAULT_BANNER: &str =
    "repline - Enter evaluates, Alt+Enter inserts a newline, Ctrl+L clears, Ctrl+D exits";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Greeting seeded as the first transcript entry.
    #[serde(default = "ConsoleConfig::default_banner")]
    pub banner: String,
    #[serde(default = "ConsoleConfig::default_prompt")]
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            banner: Self::default_banner(),
            prompt: Self::default_prompt(),
        }
    }
}

impl ConsoleConfig {
    fn default_banner() -> String {
        DEFAULT_BANNER.to_string()
    }
    fn default_prompt() -> String {
        "> ".to_string()
    }
}

/// Modifier names accepted in `[input] newline_modifiers`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModifierName {
    Shift,
    Alt,
    Ctrl,
    Meta,
    Super,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Enter combined with any of these inserts a newline instead of submitting.
    #[serde(default = "InputConfig::default_newline_modifiers")]
    pub newline_modifiers: Vec<ModifierName>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            newline_modifiers: Self::default_newline_modifiers(),
        }
    }
}

impl InputConfig {
    fn default_newline_modifiers() -> Vec<ModifierName> {
        vec![ModifierName::Shift, ModifierName::Alt, ModifierName::Ctrl]
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Program and arguments; the submitted text is written to its stdin.
    /// Empty means "echo the input back".
    #[serde(default)]
    pub command: Vec<String>,
    /// Per-evaluation timeout in milliseconds; 0 disables it.
    #[serde(default)]
    pub timeout_ms: u64,
}

impl EvaluatorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File the settings came from; `None` when defaults are in effect.
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("repline").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Replace the banner (e.g. from a command-line flag).
    pub fn override_banner(&mut self, banner: Option<String>) {
        if let Some(b) = banner {
            self.file.console.banner = b;
        }
    }

    /// Replace the evaluator command when a non-empty one is supplied.
    pub fn override_command(&mut self, command: Vec<String>) {
        if !command.is_empty() {
            self.file.evaluator.command = command;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.console.prompt, "> ");
        assert_eq!(cfg.file.console.banner, DEFAULT_BANNER);
        assert!(cfg.file.evaluator.command.is_empty());
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_console_and_evaluator_sections() {
        let tmp = write_config(
            "[console]\nbanner = \"lisp ready\"\nprompt = \"λ \"\n\n[evaluator]\ncommand = [\"sbcl\", \"--script\"]\ntimeout_ms = 1500\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.console.banner, "lisp ready");
        assert_eq!(cfg.file.console.prompt, "λ ");
        assert_eq!(cfg.file.evaluator.command, vec!["sbcl", "--script"]);
        assert_eq!(
            cfg.file.evaluator.timeout(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let tmp = write_config("[console]\nprompt = \"$ \"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.console.banner, DEFAULT_BANNER);
        assert_eq!(cfg.file.console.prompt, "$ ");
        assert_eq!(cfg.file.input, InputConfig::default());
        assert_eq!(cfg.file.evaluator.timeout(), None);
    }

    #[test]
    fn parses_newline_modifiers() {
        let tmp = write_config("[input]\nnewline_modifiers = [\"shift\", \"meta\"]\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(
            cfg.file.input.newline_modifiers,
            vec![ModifierName::Shift, ModifierName::Meta]
        );
    }

    #[test]
    fn invalid_file_falls_back_to_defaults_and_warns() {
        let tmp = write_config("[input]\nnewline_modifiers = [\"hyper\"]\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap()
        });

        assert_eq!(cfg.file, ConfigFile::default());
        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed_using_defaults"));
    }

    #[test]
    fn overrides_apply_only_when_present() {
        let mut cfg = Config::default();
        cfg.override_banner(None);
        cfg.override_command(Vec::new());
        assert_eq!(cfg.file, ConfigFile::default());

        cfg.override_banner(Some("hello".into()));
        cfg.override_command(vec!["python3".into(), "-q".into()]);
        assert_eq!(cfg.file.console.banner, "hello");
        assert_eq!(cfg.file.evaluator.command, vec!["python3", "-q"]);
    }
}
