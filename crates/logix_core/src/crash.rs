//! Structured crash reports.
//!
//! When a fault escapes a game callback the host turns it into a
//! `CrashReport`: one `FaultRecord` per cause, outermost first, each with a
//! kind name, a message and condensed stack frames. Building and formatting a
//! report never panics, so the safe-crash path can be tested without
//! faulting anything.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::error::Error as StdError;
use std::panic::{self, UnwindSafe};

use crate::error::EngineError;

pub const HEADLINE: &str = "An unhandled exception was caught which caused the game to crash (safely).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    pub kind: String,
    pub message: String,
    pub frames: Vec<String>,
}

impl FaultRecord {
    pub fn summary(&self) -> String {
        if self.message.is_empty() {
            format!("Caused by an {}", self.kind)
        } else {
            format!("Caused by an {} with the message: {}", self.kind, self.message)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrashReport {
    pub causes: Vec<FaultRecord>,
}

impl CrashReport {
    /// Walk an `anyhow` error's source chain, outermost cause first. The
    /// backtrace, when one was captured, is attached to the outermost cause.
    pub fn from_error(error: &anyhow::Error) -> Self {
        let mut causes: Vec<FaultRecord> = error
            .chain()
            .map(|cause| FaultRecord {
                kind: kind_of(cause).to_string(),
                message: cause.to_string(),
                frames: Vec::new(),
            })
            .collect();
        if let Some(first) = causes.first_mut() {
            first.frames = condense_backtrace(error.backtrace());
        }
        Self { causes }
    }

    /// Describe a caught panic. `location` is `file:line:col` when known.
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<&str>, backtrace: Option<&Backtrace>) -> Self {
        let message = panic_message(payload);
        let mut frames = backtrace.map(condense_backtrace).unwrap_or_default();
        if frames.is_empty() {
            if let Some(location) = location {
                frames.push(condense_frame(location).unwrap_or_else(|| location.to_string()));
            }
        }
        Self {
            causes: vec![FaultRecord {
                kind: "Panic".to_string(),
                message,
                frames,
            }],
        }
    }

    /// Report lines for a styled console: the headline, then per cause its
    /// summary word-wrapped to `width` columns (when given) and its frames.
    /// Everything after the headline is a continuation line.
    pub fn lines(&self, width: Option<usize>) -> Vec<String> {
        let mut lines = vec![HEADLINE.to_string()];
        for cause in &self.causes {
            let summary = cause.summary();
            match width {
                Some(width) => lines.extend(wrap_words(&summary, width)),
                None => lines.push(summary),
            }
            for frame in &cause.frames {
                lines.push(format!("  at: {frame}"));
            }
        }
        lines
    }
}

/// Where a caught panic happened, recorded by the hook from
/// `install_panic_hook`.
#[derive(Debug)]
pub struct PanicDetails {
    pub location: Option<String>,
    pub backtrace: Backtrace,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicDetails>> = const { RefCell::new(None) };
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
}

/// Record location and backtrace of every panic on the current thread. The
/// previous hook still runs for panics outside `capture_panics`.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let details = PanicDetails {
            location: info.location().map(|l| l.to_string()),
            backtrace: Backtrace::capture(),
        };
        LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(details));
        if !CAPTURING.with(Cell::get) {
            previous(info);
        }
    }));
}

/// `catch_unwind` that keeps the default panic message off the console.
pub fn capture_panics<R>(f: impl FnOnce() -> R + UnwindSafe) -> std::thread::Result<R> {
    let outer = CAPTURING.with(|c| c.replace(true));
    let result = panic::catch_unwind(f);
    CAPTURING.with(|c| c.set(outer));
    result
}

pub fn take_panic_details() -> Option<PanicDetails> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}

fn kind_of(cause: &(dyn StdError + 'static)) -> &'static str {
    if let Some(engine) = cause.downcast_ref::<EngineError>() {
        engine.kind()
    } else if cause.downcast_ref::<std::io::Error>().is_some() {
        "IoError"
    } else if cause.downcast_ref::<crate::graphics::GraphicsError>().is_some() {
        "GraphicsError"
    } else {
        "Error"
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        String::new()
    }
}

fn condense_backtrace(backtrace: &Backtrace) -> Vec<String> {
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    backtrace
        .to_string()
        .lines()
        .filter_map(condense_frame)
        .collect()
}

/// Shorten one raw backtrace line: drop the frame index and the leading `at`,
/// and keep only the file name of any path. Blank lines yield `None`.
pub fn condense_frame(raw: &str) -> Option<String> {
    let mut frame = raw.trim();
    if let Some((index, rest)) = frame.split_once(": ") {
        if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
            frame = rest.trim_start();
        }
    }
    if let Some(rest) = frame.strip_prefix("at ") {
        frame = rest.trim_start();
    }
    if let Some(cut) = frame.rfind(['/', '\\']) {
        frame = &frame[cut + 1..];
    }
    if frame.is_empty() {
        None
    } else {
        Some(frame.to_string())
    }
}

/// Greedy word wrap. Words longer than `width` are split hard.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
