//! Handler trait for log output destinations

use super::{error::Result, level::Severity, record::LogRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// A named sink that renders and persists records.
///
/// Every handler carries a severity threshold and a stable pool identity
/// (its configuration key, e.g. `"console"` or `"file:/var/log/app.log"`).
/// `close` must be idempotent: closing an already-closed handler is a
/// no-op, never an error.
pub trait Handler: Send + Sync {
    fn emit(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn threshold(&self) -> Severity;
    fn set_threshold(&mut self, level: Severity);
    fn key(&self) -> &str;
}

/// Handlers are shared between the pool, the handler set and in-flight
/// dispatch snapshots; the mutex serializes emit/flush/close so a sink is
/// never closed while it is being written to.
pub type SharedHandler = Arc<Mutex<Box<dyn Handler>>>;

/// Wrap a boxed handler for shared ownership.
pub fn shared(handler: Box<dyn Handler>) -> SharedHandler {
    Arc::new(Mutex::new(handler))
}
