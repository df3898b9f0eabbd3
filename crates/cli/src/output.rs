// Console output sink for the CLI.
//
// All user-facing text goes through one `Console` built at start-up. It owns the
// output, error and confirmation-input streams together with the switches that
// silence logs or warnings and strip ANSI formatting.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use serde::Serialize;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

/// Switches controlling what the console prints and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Print log messages (progress and results of operations).
    pub logging: bool,
    /// Print warning messages.
    pub warnings: bool,
    /// Colour warning and error labels with ANSI codes.
    pub formatted: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { logging: true, warnings: true, formatted: true }
    }
}

pub struct Console<'a> {
    config: ConsoleConfig,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    input: &'a mut dyn BufRead,
}

impl<'a> Console<'a> {
    pub fn new(
        config: ConsoleConfig,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
        input: &'a mut dyn BufRead,
    ) -> Self {
        Self { config, out, err, input }
    }

    /// Write command output. Never suppressed; this is what scripts consume.
    pub fn output(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    /// Write `value` as pretty-printed JSON.
    pub fn output_json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.output(json)
    }

    /// Write a log message. Returns `false` when logging is disabled.
    pub fn log(&mut self, message: impl Display) -> bool {
        if !self.config.logging {
            return false;
        }
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.flush();
        true
    }

    /// Write a warning to the error stream. Returns `false` when warnings are disabled.
    pub fn warn(&mut self, message: impl Display) -> bool {
        if !self.config.warnings {
            return false;
        }
        let line =
            render_label_line("warning", &message.to_string(), self.config.formatted, ANSI_YELLOW);
        let _ = writeln!(self.err, "{line}");
        let _ = self.err.flush();
        true
    }

    /// Write an error to the error stream. Errors are never suppressed.
    pub fn error(&mut self, message: impl Display) {
        let line =
            render_label_line("error", &message.to_string(), self.config.formatted, ANSI_RED);
        let _ = writeln!(self.err, "{line}");
        let _ = self.err.flush();
    }

    /// Ask a yes/no question and read one line of input.
    ///
    /// Only `y` confirms. `n` and any other answer (including end of input) abort.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        if !prompt.is_empty() {
            writeln!(self.out, "{prompt}")?;
        }
        write!(self.out, "Confirm (y/n): ")?;
        self.out.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        match answer.trim_end_matches(['\r', '\n']) {
            "y" => Ok(true),
            "n" => {
                writeln!(self.out, "Aborting.")?;
                Ok(false)
            }
            _ => {
                writeln!(self.out, "Invalid option, aborting.")?;
                Ok(false)
            }
        }
    }
}

fn render_label_line(label: &str, message: &str, formatted: bool, color: &str) -> String {
    if formatted {
        format!("{color}{label}:{ANSI_RESET} {message}")
    } else {
        format!("{label}: {message}")
    }
}
