/**
 * Background dispatcher — optional detached delivery of built reports.
 *
 * The default reporting path is synchronous: the caller blocks on the
 * POST and observes the outcome. Hosts that prefer not to stall the
 * erroring thread can construct the reporter in detached mode instead,
 * which routes built reports through a bounded channel to a single
 * worker thread:
 *
 * ```text
 *  ┌──────────────┐     bounded channel     ┌────────────────┐
 *  │  Error site   │ ───── WorkerMsg ──────► │  Worker thread  │
 *  │  (any thread) │                         │  (single)       │
 *  └──────────────┘                         └───────┬────────┘
 *                                                   │
 *                                            Transport::send()
 *                                                   │
 *                                            ┌──────▼──────┐
 *                                            │  Collector   │
 *                                            └─────────────┘
 * ```
 *
 * Each queued report still gets exactly one delivery attempt; the queue
 * holds not-yet-attempted reports only. When the queue is full, new
 * reports are dropped with a diagnostic — an error reporter must shed
 * load rather than stall or buffer without bound.
 *
 * The channel carries `WorkerMsg` variants:
 * - `Report(ErrorReport)` — a built report ready to be POSTed.
 * - `Flush(Arc<FlushSignal>)` — a signal requesting the worker to notify
 *   the caller once all preceding reports have been drained.
 *
 * The worker loop runs until the channel disconnects, i.e. when the
 * owning dispatcher is dropped.
 */
use std::io;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::http::Transport;
use crate::protocol::types::ErrorReport;

/// Bounded channel capacity. When full, new reports are dropped.
const QUEUE_CAPACITY: usize = 100;

/// Maximum time that `flush()` will block waiting for the worker
/// to drain pending reports before giving up.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// WorkerMsg
// ---------------------------------------------------------------------------

/**
 * Messages that flow through the bounded channel from reporting threads
 * to the single background worker.
 */
pub enum WorkerMsg {
    /// A built report ready to be serialized and POSTed.
    Report(ErrorReport),

    /**
     * A flush request. The worker signals `FlushSignal` once all messages
     * that were in the channel *before* this `Flush` message have been
     * processed.
     */
    Flush(Arc<FlushSignal>),
}

// ---------------------------------------------------------------------------
// FlushSignal — condvar-based notification for flush completion
// ---------------------------------------------------------------------------

/**
 * Synchronization primitive used to block the caller of `flush()` until
 * the worker has drained all pending messages.
 *
 * Uses a `Mutex<bool>` + `Condvar` pair:
 * - The bool starts as `false` (not yet flushed).
 * - The worker sets it to `true` and notifies when it processes the
 *   `Flush` message.
 * - The caller waits on the condvar with a timeout.
 */
pub struct FlushSignal {
    /// Guard protecting the "done" flag.
    mutex: Mutex<bool>,

    /// Condition variable the caller waits on.
    condvar: Condvar,
}

impl FlushSignal {
    /**
     * Creates a new `FlushSignal` in the "not yet flushed" state.
     */
    pub fn new() -> Self {
        Self {
            mutex: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /**
     * Called by the worker thread to indicate that the flush is complete.
     * Wakes up anyone waiting in `wait_timeout`.
     */
    pub fn notify(&self) {
        if let Ok(mut done) = self.mutex.lock() {
            *done = true;
            self.condvar.notify_all();
        }
    }

    /**
     * Blocks the calling thread until the worker signals completion,
     * or until `timeout` elapses — whichever comes first.
     *
     * # Returns
     * `true` if the flush completed in time, `false` if the timeout expired.
     */
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if let Ok(guard) = self.mutex.lock() {
            let result = self
                .condvar
                .wait_timeout_while(guard, timeout, |done| !*done);

            match result {
                Ok((_, timeout_result)) => !timeout_result.timed_out(),
                Err(_) => false,
            }
        } else {
            false
        }
    }
}

impl Default for FlushSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher — the sending half owned by the reporter
// ---------------------------------------------------------------------------

/**
 * Handle to the background delivery queue.
 *
 * Owns the sender side of the bounded channel; the worker thread holds
 * the receiver and exits when the dispatcher (and with it the last
 * sender) is dropped.
 */
pub struct Dispatcher {
    sender: Sender<WorkerMsg>,
}

impl Dispatcher {
    /**
     * Creates the channel and spawns the worker thread delivering
     * through `transport`.
     */
    pub fn spawn(transport: Arc<dyn Transport>) -> io::Result<Self> {
        let (sender, receiver) = crossbeam_channel::bounded(QUEUE_CAPACITY);
        Worker::spawn(receiver, transport)?;
        Ok(Self { sender })
    }

    /**
     * Enqueues a report without blocking.
     *
     * # Returns
     * `true` if the report was queued; `false` if it was dropped because
     * the queue is full or the worker has shut down.
     */
    pub fn enqueue(&self, report: ErrorReport) -> bool {
        match self.sender.try_send(WorkerMsg::Report(report)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("report queue is full; dropping report");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("delivery worker has shut down; dropping report");
                false
            }
        }
    }

    /**
     * Blocks until the worker has drained all reports queued before this
     * call, or the 2-second timeout elapses.
     *
     * # Returns
     * `true` if the flush completed within the timeout, `false` otherwise.
     */
    pub fn flush(&self) -> bool {
        let signal = Arc::new(FlushSignal::new());

        /*
         * The channel is FIFO: by the time the worker processes this
         * Flush message, every Report message queued before it has been
         * sent.
         */
        match self
            .sender
            .send_timeout(WorkerMsg::Flush(signal.clone()), FLUSH_TIMEOUT)
        {
            Ok(()) => signal.wait_timeout(FLUSH_TIMEOUT),
            Err(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Worker — the background thread
// ---------------------------------------------------------------------------

/**
 * The background worker thread.
 *
 * Spawned by `Dispatcher::spawn` and runs until the channel disconnects.
 * It processes messages sequentially:
 * - `Report` → one delivery attempt via the transport; the outcome is
 *   recorded on the log facade (there is no caller left to return it to).
 * - `Flush` → signal the requester that all prior reports are drained.
 */
struct Worker;

impl Worker {
    fn spawn(receiver: Receiver<WorkerMsg>, transport: Arc<dyn Transport>) -> io::Result<()> {
        thread::Builder::new()
            .name("snowy-delivery".into())
            .spawn(move || {
                /*
                 * catch_unwind so a panic inside Transport::send cannot
                 * kill the thread silently. We log and exit instead.
                 */
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    Self::run_loop(&receiver, transport.as_ref());
                }));

                if result.is_err() {
                    log::error!("delivery worker panicked; queued reports will be dropped");
                }
            })
            .map(|_| ())
    }

    /**
     * The main loop. Blocks on `recv()`; when the channel disconnects
     * (dispatcher dropped), `recv()` errors and the loop exits cleanly.
     */
    fn run_loop(receiver: &Receiver<WorkerMsg>, transport: &dyn Transport) {
        while let Ok(msg) = receiver.recv() {
            match msg {
                WorkerMsg::Report(report) => match transport.send(&report) {
                    Ok(delivery) if delivery.accepted() => {
                        log::debug!("report delivered with HTTP {}", delivery.status);
                    }
                    Ok(delivery) => {
                        log::warn!(
                            "collector refused report with HTTP {}: {}",
                            delivery.status,
                            delivery.body
                        );
                    }
                    Err(err) => {
                        log::warn!("report delivery failed: {err}");
                    }
                },
                WorkerMsg::Flush(signal) => {
                    signal.notify();
                }
            }
        }
    }
}
