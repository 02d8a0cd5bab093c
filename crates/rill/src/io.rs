//! Output sink for the `print` statement.
//!
//! Implement [`PrintWriter`] to capture or redirect program output; the
//! default [`StdPrint`] writes to stdout. Each `print` statement produces
//! exactly one `write_line` call with the formatted value.

use std::io::{self, Write as _};

/// Trait for handling output from `print` statements.
pub trait PrintWriter {
    /// Called once per executed `print` statement with the formatted value,
    /// without a trailing newline. The implementation owns the terminator.
    fn write_line(&mut self, line: &str);
}

/// Default writer: one line to stdout per `print`, flushed immediately so
/// interactive sessions see output before the next prompt.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn write_line(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

/// Writer that collects all output into a string, one line per `print`.
///
/// Useful for tests and for hosts that capture program output.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected output so far, newline-terminated per line.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.0
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn write_line(&mut self, line: &str) {
        self.0.push_str(line);
        self.0.push('\n');
    }
}

/// Writer that discards all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn write_line(&mut self, _line: &str) {}
}
