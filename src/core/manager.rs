//! Process-wide asynchronous dispatch manager
//!
//! The manager owns the bounded record queue, the background listener that
//! drains it, the handler pool and the per-logger handler sets. Producer
//! threads hand records to [`AsyncLogManager::enqueue`], which never blocks
//! beyond a `try_send`: a full queue (or async mode being disabled) routes
//! the record through the synchronous fallback path in the caller's thread
//! instead. Queue saturation is control flow here, not an error.

use super::dispatch::{deliver, HandlerSet, Listener};
use super::error::Result;
use super::handler::{Handler, SharedHandler};
use super::pool::HandlerPool;
use super::record::LogRecord;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

/// Default bound of the record queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Queue depth above which the monitor emits a warning.
pub const QUEUE_WARN_THRESHOLD: usize = 1_000;

/// Sampling interval of the queue-depth monitor.
pub const QUEUE_MONITOR_INTERVAL: Duration = Duration::from_secs(60);

static GLOBAL: OnceLock<AsyncLogManager> = OnceLock::new();

pub struct AsyncLogManager {
    capacity: usize,
    /// Live end of the record queue; `None` while no listener is running.
    sender: Arc<RwLock<Option<Sender<LogRecord>>>>,
    listener: Mutex<Option<Listener>>,
    handlers: Arc<RwLock<HandlerSet>>,
    pool: HandlerPool,
    async_enabled: AtomicBool,
    /// Held by the listener for the duration of each record; acquiring it
    /// therefore waits for the in-flight record to finish dispatching.
    dispatch_lock: Arc<Mutex<()>>,
}

impl AsyncLogManager {
    /// The process-wide manager, created lazily on first access.
    pub fn global() -> &'static AsyncLogManager {
        GLOBAL.get_or_init(|| AsyncLogManager::new(DEFAULT_QUEUE_CAPACITY))
    }

    /// Build a manager with a custom queue capacity.
    ///
    /// The facade always goes through [`AsyncLogManager::global`]; direct
    /// construction exists for embedding and for tests that need a small,
    /// isolated queue.
    pub fn new(capacity: usize) -> Self {
        let manager = Self {
            capacity,
            sender: Arc::new(RwLock::new(None)),
            listener: Mutex::new(None),
            handlers: Arc::new(RwLock::new(HandlerSet::new())),
            pool: HandlerPool::new(),
            async_enabled: AtomicBool::new(true),
            dispatch_lock: Arc::new(Mutex::new(())),
        };
        manager.spawn_monitor();
        manager
    }

    /// Low-frequency queue-depth monitor.
    ///
    /// Warnings go straight to stderr, never through the async path itself,
    /// so a saturated queue cannot feed itself more records. The loop runs
    /// for the lifetime of the process.
    fn spawn_monitor(&self) {
        let sender = Arc::clone(&self.sender);
        thread::spawn(move || loop {
            thread::sleep(QUEUE_MONITOR_INTERVAL);
            let depth = sender.read().as_ref().map_or(0, Sender::len);
            if depth > QUEUE_WARN_THRESHOLD {
                eprintln!(
                    "[HAPPYLOG WARNING] log queue depth {} exceeds threshold {}",
                    depth, QUEUE_WARN_THRESHOLD
                );
            }
        });
    }

    /// Hand a record to the dispatch machinery. Never fails, never blocks
    /// beyond a non-blocking send attempt.
    ///
    /// With async mode on and room in the queue the record is pushed and
    /// the call returns immediately; the listener delivers it later in
    /// strict FIFO order. A full or disconnected queue, or async mode
    /// being off, falls back to synchronous delivery in the calling
    /// thread. Fallback records may interleave out of order with records
    /// still waiting in the queue; that relaxation is deliberate.
    pub fn enqueue(&self, record: LogRecord) {
        let record = if self.async_enabled.load(Ordering::Acquire) {
            let guard = self.sender.read();
            match guard.as_ref() {
                Some(sender) => match sender.try_send(record) {
                    Ok(()) => return,
                    Err(TrySendError::Full(record))
                    | Err(TrySendError::Disconnected(record)) => record,
                },
                None => record,
            }
        } else {
            record
        };

        self.fallback_dispatch(record);
    }

    /// Deliver a record synchronously in the caller's thread, using the
    /// same per-handler isolation as the listener.
    pub fn fallback_dispatch(&self, record: LogRecord) {
        let snapshot = self
            .handlers
            .read()
            .get(&record.logger)
            .cloned()
            .unwrap_or_default();
        deliver(&snapshot, &record);
    }

    /// Atomically replace the handler sequence for `logger`.
    ///
    /// The first registration system-wide starts the listener, provided
    /// async mode is enabled.
    pub fn register_handlers(&self, logger: impl Into<String>, handlers: Vec<SharedHandler>) {
        self.handlers.write().insert(logger.into(), handlers);

        if self.async_enabled.load(Ordering::Acquire) {
            self.start_listener();
        }
    }

    /// Close and remove every handler registered for `logger`; stop the
    /// listener when no logger has handlers left.
    ///
    /// Waits for the record currently being dispatched (if any) before
    /// touching handler lifecycles, so no sink is closed mid-emit.
    /// Unknown loggers are a no-op.
    pub fn unregister_handlers(&self, logger: &str) {
        let removed = {
            let _in_flight = self.dispatch_lock.lock();
            self.handlers.write().remove(logger)
        };

        if let Some(handlers) = removed {
            for handler in handlers {
                let key = handler.lock().key().to_string();
                self.pool.close_and_remove(&key);

                // Handlers registered directly (not through the pool) still
                // need closing; close is idempotent either way.
                if let Err(e) = handler.lock().close() {
                    eprintln!("[HAPPYLOG ERROR] failed to close handler '{}': {}", key, e);
                }
            }
        }

        if self.handlers.read().is_empty() {
            self.stop_listener();
        }
    }

    /// Toggle asynchronous dispatch.
    ///
    /// Disabling stops and joins the listener; records still buffered in
    /// the queue at that point are abandoned. Re-enabling starts a fresh
    /// queue and listener if any handlers are registered.
    pub fn set_async_enabled(&self, enabled: bool) {
        self.async_enabled.store(enabled, Ordering::Release);

        if !enabled {
            self.stop_listener();
        } else if !self.handlers.read().is_empty() {
            self.start_listener();
        }
    }

    pub fn async_enabled(&self) -> bool {
        self.async_enabled.load(Ordering::Acquire)
    }

    /// Pooled handler access; see [`HandlerPool::get_or_create`].
    pub fn get_or_create_handler<F>(&self, key: &str, factory: F) -> Result<SharedHandler>
    where
        F: FnOnce() -> Result<Box<dyn Handler>>,
    {
        self.pool.get_or_create(key, factory)
    }

    /// Flush every handler of every logger.
    pub fn flush_all(&self) {
        let snapshot: Vec<SharedHandler> = self
            .handlers
            .read()
            .values()
            .flatten()
            .cloned()
            .collect();
        for handler in snapshot {
            let mut guard = handler.lock();
            if let Err(e) = guard.flush() {
                eprintln!("[HAPPYLOG ERROR] failed to flush handler '{}': {}", guard.key(), e);
            }
        }
    }

    /// Stop the listener and close every handler of every logger.
    ///
    /// Safe to call any number of times; a second invocation finds nothing
    /// left to tear down and returns quietly.
    pub fn shutdown(&self) {
        self.stop_listener();

        let names: Vec<String> = self.handlers.read().keys().cloned().collect();
        for name in names {
            self.unregister_handlers(&name);
        }
        self.pool.close_all();
    }

    /// Whether the background listener is currently running.
    pub fn listener_running(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Current number of buffered records.
    pub fn queue_depth(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }

    /// Start the listener if it is not already running. Each start gets a
    /// fresh queue: records never carry over from a previous epoch.
    fn start_listener(&self) {
        let mut listener = self.listener.lock();
        if listener.is_some() {
            return;
        }

        let (sender, receiver) = bounded(self.capacity);
        *self.sender.write() = Some(sender);
        *listener = Some(Listener::start(
            receiver,
            Arc::clone(&self.handlers),
            Arc::clone(&self.dispatch_lock),
        ));
    }

    /// Stop and join the listener. The queue, and anything still buffered
    /// in it, is discarded with the listener's receiver.
    fn stop_listener(&self) {
        let stopped = {
            *self.sender.write() = None;
            self.listener.lock().take()
        };
        if let Some(listener) = stopped {
            listener.stop();
        }
    }
}
