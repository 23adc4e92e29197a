//! Logging macros for variadic message joining.
//!
//! The facade's inherent methods take one preformatted message; these
//! macros accept any number of displayable arguments and join them with a
//! single space before handing the result over, so call sites can write
//! values side by side without formatting boilerplate.
//!
//! # Examples
//!
//! ```no_run
//! use happylog::{info, warning, HappyLog};
//!
//! let hlog = HappyLog::get().unwrap();
//!
//! info!(hlog, "server listening on port", 8080);
//! warning!(hlog, "disk usage", 93, "percent");
//! ```

/// Log a message at an explicit level, joining the arguments with spaces.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:expr),+ $(,)?) => {
        $logger.log($level, [$(::std::format!("{}", $arg)),+].join(" "))
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::Critical, $($arg),+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg),+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg),+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg),+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg),+)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::Trace, $($arg),+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::Severity;
    use parking_lot::Mutex;

    /// Captures (level, message) pairs; the macros only require a `log`
    /// method with this shape.
    struct CapturingLog {
        seen: Mutex<Vec<(Severity, String)>>,
    }

    impl CapturingLog {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }

        fn log(&self, level: Severity, message: String) {
            self.seen.lock().push((level, message));
        }
    }

    #[test]
    fn test_arguments_are_joined_with_spaces() {
        let log = CapturingLog::new();
        info!(log, "server listening on port", 8080);
        error!(log, "exit code", 1, "after", 3, "retries");

        let seen = log.seen.lock();
        assert_eq!(
            *seen,
            vec![
                (Severity::Info, "server listening on port 8080".to_string()),
                (Severity::Error, "exit code 1 after 3 retries".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_level_macro() {
        let log = CapturingLog::new();
        critical!(log, "c");
        error!(log, "e");
        warning!(log, "w");
        info!(log, "i");
        debug!(log, "d");
        trace!(log, "t");

        let levels: Vec<Severity> = log.seen.lock().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            levels,
            vec![
                Severity::Critical,
                Severity::Error,
                Severity::Warning,
                Severity::Info,
                Severity::Debug,
                Severity::Trace,
            ]
        );
    }

    #[test]
    fn test_single_argument_and_trailing_comma() {
        let log = CapturingLog::new();
        debug!(log, "just one",);
        assert_eq!(log.seen.lock()[0].1, "just one");
    }
}
