//! Record formatting
//!
//! A [`Formatter`] pairs a message template with a timestamp format and
//! renders [`LogRecord`]s into the single line a sink writes out.

use super::record::LogRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default message template: timestamp, process id, level, logger, message.
pub const DEFAULT_TEMPLATE: &str = "{time} {pid} [{level}] {logger}: {message}";

/// Default timestamp layout used when no format is configured.
pub const DEFAULT_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options for rendered records.
///
/// # Examples
///
/// ```
/// use happylog::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::DateTime.format(&ts), "2025-01-08 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45` (the built-in default)
    #[default]
    DateTime,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::DateTime => datetime.format(DEFAULT_TIMESTAMP).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Renders records into output lines.
///
/// Templates may reference `{time}`, `{pid}`, `{level}`, `{levelno}`,
/// `{logger}` and `{message}`. Unknown text is copied through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
    timestamp: TimestampFormat,
}

impl Formatter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            timestamp: TimestampFormat::default(),
        }
    }

    /// Set the message template
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Set the timestamp format
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp = format;
        self
    }

    /// Set a custom strftime timestamp format
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Render a record into a single output line (no trailing newline).
    #[must_use]
    pub fn render(&self, record: &LogRecord) -> String {
        self.template
            .replace("{time}", &self.timestamp.format(&record.timestamp))
            .replace("{pid}", &record.pid.to_string())
            .replace("{level}", record.level.to_str())
            .replace("{levelno}", &record.level.sink_level().to_string())
            .replace("{logger}", &record.logger)
            .replace("{message}", &record.message)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}
