//! Shutdown coordinator
//!
//! Guarantees that both exit paths (a termination signal, or a process
//! that simply falls off the end of `main`) stop the dispatch listener
//! and close every handler before the process goes away.
//!
//! Signal handling is an adapter at the process boundary: the C handler
//! only stores an atomic flag (the one async-signal-safe thing it can do),
//! and a small watcher thread turns that flag into the same [`run`]
//! teardown the normal exit path uses.

use crate::core::manager::AsyncLogManager;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::thread;
use std::time::Duration;

static INSTALL: Once = Once::new();
static SIGNALED: AtomicBool = AtomicBool::new(false);

/// How often the watcher thread checks for a pending termination signal.
const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Install the termination-signal handlers and the process-exit hook.
///
/// Idempotent; the facade calls this on first construction. On non-unix
/// targets only the exit hook is registered.
pub fn install() {
    INSTALL.call_once(|| {
        #[cfg(unix)]
        {
            unsafe {
                let handler = handle_signal as extern "C" fn(libc::c_int);
                libc::signal(libc::SIGINT, handler as libc::sighandler_t);
                libc::signal(libc::SIGTERM, handler as libc::sighandler_t);
                libc::atexit(run_at_exit);
            }

            thread::spawn(watch_for_signal);
        }
    });
}

/// Stop the listener and release every handler.
///
/// This is the single teardown used by signals, the exit hook and manual
/// shutdown alike. Invoking it more than once is a no-op: the second call
/// finds nothing left to tear down.
pub fn run() {
    AsyncLogManager::global().shutdown();
}

#[cfg(unix)]
extern "C" fn handle_signal(_signum: libc::c_int) {
    SIGNALED.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
extern "C" fn run_at_exit() {
    run();
}

#[cfg(unix)]
fn watch_for_signal() {
    loop {
        if SIGNALED.load(Ordering::SeqCst) {
            run();
            std::process::exit(0);
        }
        thread::sleep(SIGNAL_POLL_INTERVAL);
    }
}
