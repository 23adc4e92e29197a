//! # happylog
//!
//! Asynchronous logging subsystem: a process-wide facade that accepts
//! leveled records from any thread and delivers them to configured sinks
//! without blocking callers under normal load.
//!
//! ## How records flow
//!
//! A facade call builds a [`LogRecord`] and hands it to the
//! [`AsyncLogManager`]. With async mode on and room in the bounded queue,
//! the record is pushed and the caller returns immediately; a single
//! background listener drains the queue in FIFO order. When the queue is
//! full, or async mode is disabled, the record is instead delivered
//! synchronously in the caller's thread through the same dispatch routine,
//! so nothing is ever lost to saturation.
//!
//! ## Quick start
//!
//! ```no_run
//! use happylog::{HappyLog, Severity};
//!
//! let hlog = HappyLog::get().unwrap();
//! hlog.set_level(Severity::Debug);
//!
//! hlog.info("application started");
//! hlog.debug("connection details follow");
//!
//! hlog.enter_function("process_data");
//! hlog.var("item_count", 42);
//! hlog.exit_function("process_data");
//!
//! // Switch to synchronous delivery, e.g. right before a fork.
//! HappyLog::set_async_enabled(false);
//! ```

pub mod config;
pub mod core;
pub mod facade;
pub mod handlers;
pub mod macros;
pub mod shutdown;

pub mod prelude {
    pub use crate::config::{HandlerConfig, LogConfig};
    pub use crate::core::{
        AsyncLogManager, Formatter, Handler, HandlerPool, LogError, LogRecord, Result, Severity,
        SharedHandler, TimestampFormat, ALL_SEVERITIES, DEFAULT_QUEUE_CAPACITY,
    };
    pub use crate::facade::{HappyLog, HappyLogOptions};
    #[cfg(feature = "console")]
    pub use crate::handlers::ConsoleHandler;
    #[cfg(feature = "file")]
    pub use crate::handlers::{FileHandler, RotatingFileHandler, RotationPolicy};
}

pub use config::{HandlerConfig, LogConfig};
pub use core::{
    shared, AsyncLogManager, Formatter, Handler, HandlerPool, LogError, LogRecord, Result,
    Severity, SharedHandler, TimestampFormat, ALL_SEVERITIES, DEFAULT_QUEUE_CAPACITY,
    QUEUE_MONITOR_INTERVAL, QUEUE_WARN_THRESHOLD,
};
pub use facade::{HappyLog, HappyLogOptions};

#[cfg(feature = "console")]
pub use handlers::ConsoleHandler;
#[cfg(feature = "file")]
pub use handlers::{FileHandler, RotatingFileHandler, RotationPolicy};
