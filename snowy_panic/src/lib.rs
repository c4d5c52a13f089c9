/*!
 * Snowy Panic Hook — automatic panic capture for the Snowy SDK.
 *
 * This crate provides a single function `install()` that registers a
 * custom `std::panic::set_hook` handler bound to a reporter. When a
 * panic occurs, it:
 *
 * 1. Extracts the panic message and source location.
 * 2. Captures a backtrace at the panic site.
 * 3. Builds a severity-1 ("Error") trigger and reports it through the
 *    injected `Reporter`.
 * 4. Calls the previous panic hook (so the default stderr output is
 *    preserved).
 *
 * The hook holds its own `Arc<Reporter>` — there is no process global;
 * the host decides which reporter receives panics.
 *
 * # Recursion safety
 *
 * The hook uses a `thread_local` boolean flag to prevent infinite
 * recursion if reporting itself were to panic.
 */

use std::cell::Cell;
use std::panic;
use std::panic::PanicHookInfo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use snowy_core::{severity, ErrorTrigger, Reporter, Trace};

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Ensures `install()` is idempotent — calling it multiple times
/// won't stack hooks and produce duplicate reports per panic.
static INSTALLED: AtomicBool = AtomicBool::new(false);

thread_local! {
    /**
     * Per-thread flag that prevents re-entrancy into the panic hook.
     * Breaks recursion if reporting itself panics.
     */
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/**
 * Installs the Snowy panic hook bound to `reporter`.
 *
 * Replaces the current panic hook with one that:
 * 1. Reports the panic through `reporter` as a severity-1 error.
 * 2. Forwards to the *previous* hook (preserving default behaviour).
 *
 * Idempotent — subsequent calls are silent no-ops, keeping the reporter
 * from the first call.
 */
pub fn install(reporter: Arc<Reporter>) {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let is_recursive = IN_HOOK.with(|flag| {
            if flag.get() {
                true
            } else {
                flag.set(true);
                false
            }
        });

        if !is_recursive {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                report_panic(&reporter, info);
            }));

            IN_HOOK.with(|flag| flag.set(false));
        }

        previous_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Internal: build and send the panic report
// ---------------------------------------------------------------------------

fn report_panic(reporter: &Reporter, info: &PanicHookInfo) {
    let message = match info.payload().downcast_ref::<&str>() {
        Some(s) => (*s).to_string(),
        None => match info.payload().downcast_ref::<String>() {
            Some(s) => s.clone(),
            None => "<unknown panic>".to_string(),
        },
    };

    let (file, line) = match info.location() {
        Some(loc) => (Some(loc.file().to_string()), Some(loc.line())),
        None => (None, None),
    };

    let thread_name = std::thread::current()
        .name()
        .unwrap_or("<unnamed>")
        .to_string();

    /*
     * The backtrace is captured here, inside the hook, so the frames
     * lead to the panic site rather than to the reporting machinery.
     */
    let bt = backtrace::Backtrace::new();
    let trace = Trace::from_frames(snowy_core::convert_backtrace(&bt));

    let trigger = ErrorTrigger {
        code: severity::ERROR,
        message: Some(format!("panic: {message} [thread: {thread_name}]")),
        file,
        line,
    };

    /*
     * The visitor block for a panic is whatever the reporter's ambient
     * source can supply; a process without request context reports
     * sentinels.
     */
    reporter.report(&trigger, reporter.visitor_context(), trace);
}
