//! Handler registry and pool
//!
//! Sinks are created lazily on first reference and reused for every later
//! request with the same key. The pool is the exclusive owner of handler
//! lifecycles: only the pool closes a pooled handler, and only after the
//! manager has removed it from every handler set.

use super::error::Result;
use super::handler::{shared, Handler, SharedHandler};
use parking_lot::Mutex;
use std::collections::HashMap;

pub struct HandlerPool {
    inner: Mutex<HashMap<String, SharedHandler>>,
}

impl HandlerPool {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Return the pooled handler for `key`, constructing it via `factory`
    /// exactly once per key.
    ///
    /// The pool lock is held across the factory call, so two threads
    /// requesting the same key concurrently always receive the same
    /// instance: the first caller wins, the second reuses.
    ///
    /// # Errors
    ///
    /// Propagates the factory error (e.g. a file that cannot be opened);
    /// nothing is inserted in that case.
    pub fn get_or_create<F>(&self, key: &str, factory: F) -> Result<SharedHandler>
    where
        F: FnOnce() -> Result<Box<dyn Handler>>,
    {
        let mut pool = self.inner.lock();
        if let Some(existing) = pool.get(key) {
            return Ok(SharedHandler::clone(existing));
        }

        let handler = shared(factory()?);
        pool.insert(key.to_string(), SharedHandler::clone(&handler));
        Ok(handler)
    }

    /// Close the handler pooled under `key` and forget it.
    ///
    /// Unknown keys are a no-op, so unregistering twice is harmless.
    pub fn close_and_remove(&self, key: &str) {
        let removed = self.inner.lock().remove(key);
        if let Some(handler) = removed {
            if let Err(e) = handler.lock().close() {
                eprintln!("[HAPPYLOG ERROR] failed to close handler '{}': {}", key, e);
            }
        }
    }

    /// Close every pooled handler and empty the pool.
    pub fn close_all(&self) {
        let drained: Vec<(String, SharedHandler)> = self.inner.lock().drain().collect();
        for (key, handler) in drained {
            if let Err(e) = handler.lock().close() {
                eprintln!("[HAPPYLOG ERROR] failed to close handler '{}': {}", key, e);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for HandlerPool {
    fn default() -> Self {
        Self::new()
    }
}
