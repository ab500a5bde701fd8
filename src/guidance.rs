//! Operator-facing output.
//!
//! Guidance is observational: write failures (closed pipe and the like) are
//! ignored and never change a hook's exit code.

use std::fmt::Display;
use std::io::Write;

/// Hook output streams.
pub struct Console<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Print a line to stdout.
    pub fn say(&mut self, line: impl Display) {
        let _ = writeln!(self.out, "{}", line);
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    /// Print a line to stderr.
    pub fn error(&mut self, line: impl Display) {
        let _ = writeln!(self.err, "{}", line);
    }

    /// Echo captured child stdout as-is.
    pub fn echo_out(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }

    /// Echo captured child stderr as-is.
    pub fn echo_err(&mut self, text: &str) {
        let _ = self.err.write_all(text.as_bytes());
    }

    /// Flush both streams, before a child inherits them.
    pub fn flush(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}
