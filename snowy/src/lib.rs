/**
 * Snowy — remote error reporting SDK for Rust.
 *
 * This is the main crate users should depend on. It re-exports the core
 * SDK API and wires up addons (panic hook, etc.) through a single `init`
 * call.
 *
 * # Quick start
 *
 * ```ignore
 * use snowy::{ApplicationInfo, Config};
 *
 * fn main() {
 *     let config = Config::new(
 *         "botsko",
 *         "20c49a711426788d6f91",
 *         103,
 *         ApplicationInfo::new("My App", "1.0", "2364"),
 *     );
 *
 *     let guard = snowy::init(config, Default::default()).unwrap();
 *
 *     // report an application error; panics are captured automatically
 *     guard.reporter().raise(512, "Checkout failed", file!(), line!());
 *
 *     // guard is dropped here → pending reports are flushed
 * }
 * ```
 *
 * # With options
 *
 * ```ignore
 * let guard = snowy::init(config, snowy::Options {
 *     catch_panics: false,
 *     detached: true,   // deliver from a background thread
 * }).unwrap();
 * ```
 */

use std::sync::Arc;

// ---------------------------------------------------------------------------
// Re-exports from snowy_core — the public surface area
// ---------------------------------------------------------------------------

pub use snowy_core::{
    capture_trace, convert_backtrace, default_hash, severity, split_header_body, ApplicationInfo,
    Config, ConfigError, ContextSource, Delivery, EnvSource, ErrorDetails, ErrorReport,
    ErrorTrigger, Guard, HttpTransport, InitError, Outcome, Reporter, Trace, TraceFrame,
    Transport, TransmitError, VisitorContext, DEFAULT_ENDPOINT, REPORTER_AGENT,
};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/**
 * Addon and delivery options for [`init`].
 *
 * Defaults: panics are captured, delivery is synchronous.
 */
pub struct Options {
    /// Whether to install a panic hook that auto-reports panics.
    /// Defaults to `true`.
    pub catch_panics: bool,

    /// Deliver reports from a background worker thread instead of
    /// blocking the erroring thread. Defaults to `false` — the caller
    /// observes each delivery outcome directly.
    pub detached: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            catch_panics: true,
            detached: false,
        }
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/**
 * Initializes the Snowy SDK.
 *
 * Validates the configuration, constructs the reporter in the requested
 * delivery mode, and installs the panic hook unless opted out.
 *
 * # Returns
 * A [`Guard`] owning the reporter — keep it alive for the duration of
 * your app. Reach the reporter via [`Guard::reporter`] to raise errors
 * or hand the handler closure to your runtime; when the guard drops,
 * pending reports are flushed.
 *
 * # Errors
 * [`InitError`] when the configuration is rejected or the background
 * worker cannot be spawned.
 */
pub fn init(config: Config, options: Options) -> Result<Guard, InitError> {
    let reporter = if options.detached {
        Reporter::detached(config)?
    } else {
        Reporter::new(config)?
    };
    let reporter = Arc::new(reporter);

    /*
     * Panic hook is opt-out — most hosts want panics reported. The hook
     * keeps its own Arc, so the guard and the hook are independent.
     */
    if options.catch_panics {
        snowy_panic::install(Arc::clone(&reporter));
    }

    Ok(Guard::new(reporter))
}
