//! Log record structure

use super::level::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of log data.
///
/// Records are created at the call site with an already-formatted message
/// and are never mutated afterwards; the queue/dispatch path is their sole
/// owner until a sink consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Name of the logger this record was emitted through.
    pub logger: String,
    pub level: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Process identity, recorded at construction time.
    pub pid: u32,
}

impl LogRecord {
    /// Sanitize the message to prevent log injection attacks.
    ///
    /// Newlines, carriage returns and tabs are replaced with escape
    /// sequences so a crafted message cannot forge additional entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(logger: impl Into<String>, level: Severity, message: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            level,
            message: Self::sanitize_message(&message.into()),
            timestamp: Utc::now(),
            pid: std::process::id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields() {
        let record = LogRecord::new("root", Severity::Info, "hello");
        assert_eq!(record.logger, "root");
        assert_eq!(record.level, Severity::Info);
        assert_eq!(record.message, "hello");
        assert_eq!(record.pid, std::process::id());
    }

    #[test]
    fn test_message_sanitization() {
        let record = LogRecord::new(
            "root",
            Severity::Info,
            "line one\nERROR forged entry\twith tab\r",
        );
        assert!(!record.message.contains('\n'));
        assert!(record.message.contains("\\n"));
        assert!(record.message.contains("\\t"));
        assert!(record.message.contains("\\r"));
    }
}
