//! Verbosity-gated, indented progress output.
//!
//! [`Logger`] is the only mutable state of a sync run besides the
//! filesystem. It is threaded through the planner explicitly; tests use
//! [`Logger::capture`] to inspect the emitted lines.

use std::fmt::Display;
use std::io::{self, Write};

/// Default tier: sources, clients and pending copies.
pub const INFO: u8 = 1;
/// Second tier: outputs that are already up to date.
pub const DETAIL: u8 = 2;

const INDENT: &str = "  ";

#[derive(Debug)]
enum Sink {
    Stdout,
    Capture(Vec<String>),
}

/// Progress logger with a verbosity threshold and a nesting depth.
#[derive(Debug)]
pub struct Logger {
    verbosity: u8,
    depth: usize,
    sink: Sink,
}

impl Logger {
    /// Log to standard output.
    #[must_use]
    pub fn stdout(verbosity: u8) -> Self {
        Self {
            verbosity,
            depth: 0,
            sink: Sink::Stdout,
        }
    }

    /// Keep lines in memory, see [`Logger::lines`].
    #[must_use]
    pub fn capture(verbosity: u8) -> Self {
        Self {
            verbosity,
            depth: 0,
            sink: Sink::Capture(Vec::new()),
        }
    }

    /// Configured verbosity.
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Whether messages of `level` are emitted.
    #[must_use]
    pub fn enabled(&self, level: u8) -> bool {
        level <= self.verbosity
    }

    /// Emit `message` at the current depth if `level` is enabled.
    pub fn log(&mut self, level: u8, message: impl Display) {
        if !self.enabled(level) {
            return;
        }
        let line = format!("{}{}", INDENT.repeat(self.depth), message);
        match &mut self.sink {
            // A closed stdout must not abort the copies
            Sink::Stdout => {
                let _ = writeln!(io::stdout().lock(), "{line}");
            }
            Sink::Capture(lines) => lines.push(line),
        }
    }

    /// Shorthand for `log(INFO, ..)`.
    pub fn info(&mut self, message: impl Display) {
        self.log(INFO, message);
    }

    /// Shorthand for `log(DETAIL, ..)`.
    pub fn detail(&mut self, message: impl Display) {
        self.log(DETAIL, message);
    }

    /// Nest following lines one level deeper.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Undo one [`Logger::indent`].
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Captured lines. Always empty for [`Logger::stdout`].
    #[must_use]
    pub fn lines(&self) -> &[String] {
        match &self.sink {
            Sink::Stdout => &[],
            Sink::Capture(lines) => lines,
        }
    }
}
