/**
 * RAII guard returned by `snowy::init()`.
 *
 * The guard keeps the reporter alive and flushes pending background
 * reports before the process exits, via Rust's `Drop` trait:
 *
 * ```ignore
 * fn main() {
 *     let guard = snowy::init(config, Default::default()).unwrap();
 *
 *     // ... application logic, errors get reported ...
 *
 * }   // <-- guard is dropped here, triggering flush()
 * ```
 *
 * In synchronous delivery mode the flush is a no-op; in detached mode it
 * blocks (with the worker's 2-second timeout) until queued reports have
 * been attempted. Best-effort delivery is the contract: a timed-out
 * flush drops silently apart from a log line.
 */
use std::sync::Arc;

use crate::reporter::Reporter;

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/**
 * Flush-on-drop handle to a reporter.
 *
 * Owns an `Arc<Reporter>` — there is no process-global reporter to reach
 * back into, so the guard carries its own reference. Clone the `Arc` out
 * via [`Guard::reporter`] to raise errors or build handler closures.
 */
pub struct Guard {
    reporter: Arc<Reporter>,
}

impl Guard {
    /**
     * Wraps a reporter in a flush-on-drop guard.
     */
    pub fn new(reporter: Arc<Reporter>) -> Self {
        Self { reporter }
    }

    /// The guarded reporter.
    pub fn reporter(&self) -> &Arc<Reporter> {
        &self.reporter
    }
}

impl Drop for Guard {
    /**
     * Drains pending background reports on scope exit. A flush that does
     * not complete within the worker timeout is logged and abandoned.
     */
    fn drop(&mut self) {
        if !self.reporter.flush() {
            log::warn!("flush timed out; some reports may not have been sent");
        }
    }
}
