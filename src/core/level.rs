//! Severity scale and level mapping

use super::error::{LogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal severity scale used by the facade.
///
/// `Critical` is the most urgent level, `Trace` the most verbose. The
/// discriminants are the public ordinal surface (0–5); use
/// [`Severity::from_ordinal`] to convert untrusted integers.
///
/// Filtering follows the urgency order: a record of level `S` passes a
/// threshold `T` iff `S` is at-or-more-urgent than `T`, i.e. `S <= T` in
/// ordinal terms. A handler at `Info` therefore delivers `Info`, `Warning`,
/// `Error` and `Critical`, and suppresses `Debug` and `Trace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical = 0,
    Error = 1,
    #[serde(alias = "warn")]
    Warning = 2,
    #[default]
    Info = 3,
    Debug = 4,
    Trace = 5,
}

/// All levels, most urgent first. Handy for exhaustive filtering checks.
pub const ALL_SEVERITIES: [Severity; 6] = [
    Severity::Critical,
    Severity::Error,
    Severity::Warning,
    Severity::Info,
    Severity::Debug,
    Severity::Trace,
];

impl Severity {
    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    /// Public ordinal of this level (0 = CRITICAL .. 5 = TRACE).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Convert a raw ordinal into a level.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidLevel`] for anything outside `0..=5`;
    /// callers are expected to leave their current level untouched in that
    /// case.
    ///
    /// # Examples
    ///
    /// ```
    /// use happylog::Severity;
    ///
    /// assert_eq!(Severity::from_ordinal(3).unwrap(), Severity::Info);
    /// assert!(Severity::from_ordinal(100).is_err());
    /// ```
    pub fn from_ordinal(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Severity::Critical),
            1 => Ok(Severity::Error),
            2 => Ok(Severity::Warning),
            3 => Ok(Severity::Info),
            4 => Ok(Severity::Debug),
            5 => Ok(Severity::Trace),
            _ => Err(LogError::InvalidLevel { value }),
        }
    }

    /// Sink-facing numeric severity.
    ///
    /// This is the scale file and console sinks record in their output
    /// (`{levelno}` in format templates): CRITICAL=50 down to DEBUG=10,
    /// with TRACE sitting just below DEBUG at 9.
    pub fn sink_level(self) -> u8 {
        match self {
            Severity::Critical => 50,
            Severity::Error => 40,
            Severity::Warning => 30,
            Severity::Info => 20,
            Severity::Debug => 10,
            Severity::Trace => 9,
        }
    }

    /// True if a record at `level` should be delivered by a sink whose
    /// threshold is `self`.
    pub fn allows(self, level: Severity) -> bool {
        level <= self
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Critical => BrightRed,
            Severity::Error => Red,
            Severity::Warning => Yellow,
            Severity::Info => Green,
            Severity::Debug => Blue,
            Severity::Trace => BrightBlack,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            "ERROR" => Ok(Severity::Error),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "INFO" => Ok(Severity::Info),
            "DEBUG" => Ok(Severity::Debug),
            "TRACE" => Ok(Severity::Trace),
            _ => Err(LogError::InvalidLevelName { name: s.to_string() }),
        }
    }
}
