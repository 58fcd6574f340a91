//! Bump-allocating game logger
//!
//! Temporary message formatting goes through a bump arena that is reset
//! whenever the buffer is cleared; captured entries own their strings.

use crate::game::VerbosityLevel;
use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt::{self, Write as FmtWrite};
use std::ops::Deref;

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A log entry with owned strings
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "replay", "game_event")
    pub category: Option<&'static str>,
}

/// Guard type that provides read-only access to log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger owned by the game
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Scratch arena for formatting, reset with the buffer
    format_bump: RefCell<Bump>,

    /// Captured log entries
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Access captured entries without copying
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
        self.format_bump.borrow_mut().reset();
    }

    fn log_to_stdout(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        match self.output_format {
            OutputFormat::Text => {
                if level == VerbosityLevel::Minimal {
                    println!("{}", message);
                } else {
                    println!("  {}", message);
                }
            }
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "level": level,
                    "category": category,
                    "message": message,
                });
                println!("{}", line);
            }
        }
    }

    fn emit(&self, level: VerbosityLevel, category: Option<&'static str>, message: &str) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category,
            });
        }

        if should_output && level <= self.verbosity {
            self.log_to_stdout(level, category, message);
        }
    }

    /// Format into the bump arena, skipping the work entirely when nobody
    /// will see the message
    pub fn log_fmt(&self, level: VerbosityLevel, category: Option<&'static str>, args: fmt::Arguments<'_>) {
        if level == VerbosityLevel::Silent || (level > self.verbosity && !self.is_capturing()) {
            return;
        }
        let bump = self.format_bump.borrow();
        let mut message = bumpalo::collections::String::new_in(&bump);
        if message.write_fmt(args).is_ok() {
            self.emit(level, category, &message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log_fmt(VerbosityLevel::Minimal, None, format_args!("{}", message));
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log_fmt(VerbosityLevel::Normal, None, format_args!("{}", message));
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log_fmt(VerbosityLevel::Verbose, None, format_args!("{}", message));
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

/// `game_log!(logger, Normal, "replay", "{} attacks", who)`
#[macro_export]
macro_rules! game_log {
    ($logger:expr, $level:ident, $category:expr, $($arg:tt)*) => {
        $logger.log_fmt(
            $crate::game::VerbosityLevel::$level,
            Some($category),
            format_args!($($arg)*),
        )
    };
}
