//! Console handler implementation

use crate::core::{Formatter, Handler, LogError, LogRecord, Result, Severity};
use colored::Colorize;
use std::io::Write;

/// Pool identity of the process console sink.
pub const CONSOLE_KEY: &str = "console";

pub struct ConsoleHandler {
    threshold: Severity,
    formatter: Formatter,
    use_colors: bool,
    closed: bool,
}

impl ConsoleHandler {
    pub fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            formatter: Formatter::default(),
            use_colors: true,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl Handler for ConsoleHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        if self.closed {
            return Err(LogError::handler(CONSOLE_KEY, "handler is closed"));
        }

        let line = self.formatter.render(record);
        let line = if self.use_colors {
            line.color(record.level.color_code()).to_string()
        } else {
            line
        };

        // Urgent levels go to stderr, the rest to stdout.
        match record.level {
            Severity::Critical | Severity::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.flush()
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn set_threshold(&mut self, level: Severity) {
        self.threshold = level;
    }

    fn key(&self) -> &str {
        CONSOLE_KEY
    }
}
