//! Core types: severity scale, records, dispatch machinery

pub mod dispatch;
pub mod error;
pub mod format;
pub mod handler;
pub mod level;
pub mod manager;
pub mod pool;
pub mod record;

pub use dispatch::{deliver, HandlerSet};
pub use error::{LogError, Result};
pub use format::{Formatter, TimestampFormat, DEFAULT_TEMPLATE, DEFAULT_TIMESTAMP};
pub use handler::{shared, Handler, SharedHandler};
pub use level::{Severity, ALL_SEVERITIES};
pub use manager::{
    AsyncLogManager, DEFAULT_QUEUE_CAPACITY, QUEUE_MONITOR_INTERVAL, QUEUE_WARN_THRESHOLD,
};
pub use pool::HandlerPool;
pub use record::LogRecord;
