//! Record delivery: the background listener and the shared dispatch routine
//!
//! Both delivery paths, the queue-draining listener and the synchronous
//! fallback taken by producer threads, go through [`deliver`], so they can
//! never disagree about filtering or failure isolation.

use super::handler::SharedHandler;
use super::record::LogRecord;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Logger name → ordered handlers currently active for that logger.
pub type HandlerSet = HashMap<String, Vec<SharedHandler>>;

/// How often the listener wakes from an idle queue to check its stop flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Deliver one record to each handler in order.
///
/// A handler only receives the record if its own threshold allows the
/// record's level. A handler that returns an error (or panics) is
/// reported on the stderr side channel and skipped; later handlers and
/// later records are unaffected. Failures never propagate to the caller.
pub fn deliver(handlers: &[SharedHandler], record: &LogRecord) {
    for handler in handlers {
        let mut guard = handler.lock();
        if !guard.threshold().allows(record.level) {
            continue;
        }

        let result = catch_unwind(AssertUnwindSafe(|| guard.emit(record)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!(
                    "[HAPPYLOG ERROR] handler '{}' failed for logger '{}': {}",
                    guard.key(),
                    record.logger,
                    e
                );
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                eprintln!(
                    "[HAPPYLOG ERROR] handler '{}' panicked: {}. Other handlers continue.",
                    guard.key(),
                    panic_msg
                );
            }
        }
    }
}

/// The single background worker draining the record queue.
///
/// Stopping is drain-current-then-stop: [`Listener::stop`] raises the stop
/// flag and joins, so the thread finishes the record it has already
/// dequeued and never pops another. Records still buffered in the channel
/// at that point are abandoned with it.
pub(crate) struct Listener {
    stop: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl Listener {
    pub(crate) fn start(
        receiver: Receiver<LogRecord>,
        handlers: Arc<RwLock<HandlerSet>>,
        dispatch_lock: Arc<Mutex<()>>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Acquire) {
                match receiver.recv_timeout(STOP_POLL_INTERVAL) {
                    Ok(record) => {
                        // Hold the dispatch lock for the whole record so an
                        // unregister cannot close a handler mid-emit.
                        let _in_flight = dispatch_lock.lock();
                        let snapshot = handlers
                            .read()
                            .get(&record.logger)
                            .cloned()
                            .unwrap_or_default();
                        deliver(&snapshot, &record);
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self { stop, handle }
    }

    /// Signal the worker to exit after the current record and join it.
    pub(crate) fn stop(self) {
        self.stop.store(true, Ordering::Release);
        if self.handle.join().is_err() {
            eprintln!("[HAPPYLOG ERROR] listener thread panicked during shutdown");
        }
    }
}
