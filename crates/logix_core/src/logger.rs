//! Line-numbered, leveled engine log.
//!
//! Every retained record takes the next number from one shared counter, no
//! matter its severity, so the console output reads as a single numbered
//! transcript:
//!
//! ```text
//! 0001 12:00:01::042 ····· ENGINE » This game is using LogixEngine version 1.0.0
//! 0002 12:00:01::043 ······ DEBUG » Loading assets...
//! 0003 12:00:01::043 ······ DEBUG »     Loading textures...
//! 0004                                  Caused by ...
//! ```
//!
//! Debug records are dropped entirely (no number consumed) unless debug mode
//! is on. Everything else is always retained, and echoed through the `log`
//! facade (target `logix`) while the console is visible. `*_continued`
//! variants blank the timestamp and tag columns so wrapped text lines up under
//! the entry it continues.
//!
//! The logger is shared by reference between the host, registries and
//! loaders; its state sits behind a mutex so `&Logger` is all anyone needs.
//! Cloning yields another handle onto the same transcript.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

pub const LOG_TARGET: &str = "logix";

/// Spaces added per indentation level.
pub const INDENT_WIDTH: usize = 4;

const TIMESTAMP_PLACEHOLDER: &str = "             ";
const TAG_PLACEHOLDER: &str = "               ";

/// Column at which message text starts (for four-digit line numbers).
pub const MESSAGE_COLUMN: usize = 4 + 1 + TIMESTAMP_PLACEHOLDER.len() + 1 + TAG_PLACEHOLDER.len();

/// Names per "Registered types" line when flushing highlight types.
const TYPE_BATCH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Debug,
    Warning,
    Error,
    Critical,
    /// Engine banner messages ("This game is using LogixEngine version ...").
    Engine,
    /// Unstyled output used when the console is not set up for the log.
    Raw,
}

impl Severity {
    pub const ALL: &'static [Severity] = &[
        Severity::Info,
        Severity::Debug,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Engine,
        Severity::Raw,
    ];

    /// Channel column text. All tags have the same display width.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "······· INFO » ",
            Self::Debug => "······ DEBUG » ",
            Self::Warning => "···· WARNING » ",
            Self::Error => "······ ERROR » ",
            Self::Critical => "··· CRITICAL » ",
            Self::Engine => "LOGIX-ENGINE » ",
            Self::Raw => TAG_PLACEHOLDER,
        }
    }

    pub fn log_level(self) -> log::Level {
        match self {
            Self::Info | Self::Engine | Self::Raw => log::Level::Info,
            Self::Debug => log::Level::Debug,
            Self::Warning => log::Level::Warn,
            Self::Error | Self::Critical => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub sequence: u64,
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    /// Continuation lines render blank timestamp and tag columns.
    pub continued: bool,
    pub depth: usize,
    pub message: String,
}

impl LogRecord {
    pub fn line(&self) -> String {
        let indent = " ".repeat(self.depth * INDENT_WIDTH);
        if self.continued {
            format!(
                "{:04} {} {}{}{}",
                self.sequence, TIMESTAMP_PLACEHOLDER, TAG_PLACEHOLDER, indent, self.message
            )
        } else {
            format!(
                "{:04} {} {}{}{}",
                self.sequence,
                self.timestamp.format("%H:%M:%S::%3f"),
                self.severity.tag(),
                indent,
                self.message
            )
        }
    }
}

#[derive(Debug, Default)]
struct LoggerState {
    records: Vec<LogRecord>,
    sequence: u64,
    depth: usize,
    debug: bool,
    console_visible: bool,
    registered_types: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Logger {
    state: Arc<Mutex<LoggerState>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_debug(&self, enabled: bool) {
        self.state.lock().debug = enabled;
    }

    pub fn debug_enabled(&self) -> bool {
        self.state.lock().debug
    }

    pub fn set_console_visible(&self, visible: bool) {
        self.state.lock().console_visible = visible;
    }

    pub fn console_visible(&self) -> bool {
        self.state.lock().console_visible
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Severity::Info, false, message.into());
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.push(Severity::Debug, false, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Severity::Warning, false, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, false, message.into());
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.push(Severity::Critical, false, message.into());
    }

    pub fn engine(&self, message: impl Into<String>) {
        self.push(Severity::Engine, false, message.into());
    }

    pub fn info_continued(&self, message: impl Into<String>) {
        self.push(Severity::Info, true, message.into());
    }

    pub fn debug_continued(&self, message: impl Into<String>) {
        self.push(Severity::Debug, true, message.into());
    }

    pub fn warning_continued(&self, message: impl Into<String>) {
        self.push(Severity::Warning, true, message.into());
    }

    pub fn error_continued(&self, message: impl Into<String>) {
        self.push(Severity::Error, true, message.into());
    }

    pub fn critical_continued(&self, message: impl Into<String>) {
        self.push(Severity::Critical, true, message.into());
    }

    /// Write `message` straight to stderr without columns or styling, and
    /// retain it like any other record.
    pub fn write_raw(&self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("  » {message}");
        let mut state = self.state.lock();
        state.sequence += 1;
        let record = LogRecord {
            sequence: state.sequence,
            timestamp: Local::now(),
            severity: Severity::Raw,
            continued: false,
            depth: 0,
            message,
        };
        state.records.push(record);
    }

    fn push(&self, severity: Severity, continued: bool, message: String) {
        let (line, echo) = {
            let mut state = self.state.lock();
            if severity == Severity::Debug && !state.debug {
                return;
            }
            state.sequence += 1;
            let record = LogRecord {
                sequence: state.sequence,
                timestamp: Local::now(),
                severity,
                continued,
                depth: state.depth,
                message,
            };
            let line = record.line();
            state.records.push(record);
            (line, state.console_visible)
        };
        if echo {
            log::log!(target: LOG_TARGET, severity.log_level(), "{line}");
        }
    }

    pub fn indent(&self) {
        self.state.lock().depth += 1;
    }

    pub fn unindent(&self) {
        let mut state = self.state.lock();
        state.depth = state.depth.saturating_sub(1);
    }

    pub fn reset_indentation(&self) {
        self.state.lock().depth = 0;
    }

    pub fn depth(&self) -> usize {
        self.state.lock().depth
    }

    /// Log `"{name}..."`, run `task` one level deeper, then log completion.
    /// With debug mode off the task just runs.
    pub fn run_task<T, E>(&self, name: &str, task: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if !self.debug_enabled() {
            return task();
        }
        self.debug(format!("{name}..."));
        let result = {
            let _indent = IndentGuard::new(self);
            task()
        };
        if result.is_ok() {
            self.debug(format!("{name} completed"));
        }
        result
    }

    /// Time `task` and report the elapsed milliseconds at debug level. With
    /// `log_as_task` the task is also bracketed like `run_task`. Errors from
    /// the task are returned after the indentation has been restored.
    pub fn profile<T, E>(
        &self,
        name: &str,
        log_as_task: bool,
        task: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if !self.debug_enabled() {
            return task();
        }
        if log_as_task {
            self.debug(format!("{name}..."));
        }
        let (result, elapsed_ms) = {
            let _indent = log_as_task.then(|| IndentGuard::new(self));
            let started = Instant::now();
            let result = task();
            (result, started.elapsed().as_millis())
        };
        if result.is_ok() {
            let unit = if elapsed_ms == 1 { "millisecond" } else { "milliseconds" };
            if log_as_task {
                self.debug(format!("{name} completed in {elapsed_ms} {unit}"));
            } else {
                self.debug(format!("{name} took {elapsed_ms} {unit}"));
            }
        }
        result
    }

    /// Queue a type name for the console highlighter's type list.
    pub fn register_type(&self, name: impl Into<String>) {
        self.state.lock().registered_types.push(name.into());
    }

    pub fn pending_types(&self) -> usize {
        self.state.lock().registered_types.len()
    }

    /// Log queued type names in batches of ten and clear the queue.
    pub fn flush_registered_types(&self) {
        let names = std::mem::take(&mut self.state.lock().registered_types);
        for batch in names.chunks(TYPE_BATCH) {
            self.debug(format!("Registered types: {}", batch.join(", ")));
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_sequence(&self) -> u64 {
        self.state.lock().sequence
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.state.lock().records.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.lock().records.iter().map(LogRecord::line).collect()
    }
}

/// Indents on creation and unindents on drop, so a failing or panicking task
/// cannot leave the log shifted.
struct IndentGuard<'a> {
    logger: &'a Logger,
}

impl<'a> IndentGuard<'a> {
    fn new(logger: &'a Logger) -> Self {
        logger.indent();
        Self { logger }
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.logger.unindent();
    }
}
