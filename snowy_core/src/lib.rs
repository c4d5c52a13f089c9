/*!
 * Snowy Core — the internal SDK engine.
 *
 * This crate implements the report construction and delivery pipeline
 * for the Snowy Evening error tracker. End users should depend on the
 * `snowy` facade crate instead, which re-exports everything and wires up
 * addons (panic hook, etc.).
 *
 * The pipeline is a one-way flow with a single early-out:
 *
 * ```text
 * trigger ──► ReportBuilder ──► ErrorReport ──► Transport ──► outcome
 *    │
 *    └── code == 0 → skipped, nothing built or sent
 * ```
 *
 * # Module structure
 *
 * - `protocol/` — what we send: report types, severity catalog, dedup hash
 * - `transport/` — how we deliver: HTTP client, optional background worker
 * - `config` — static credentials/endpoint/application configuration
 * - `context` — ambient visitor context lookup
 * - `builder` — trigger → report assembly
 * - `reporter` — wiring, outcomes, the installable handler closure
 * - `guard` — RAII flush-on-drop
 */

mod builder;
mod config;
mod context;
mod guard;
mod protocol;
mod reporter;
mod transport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builder::ReportBuilder;
pub use config::{Config, ConfigError};
pub use context::{
    ContextSource, EnvSource, KEY_HTTP_REFERER, KEY_HTTP_USER_AGENT, KEY_REMOTE_ADDR,
    KEY_REQUEST_URI,
};
pub use guard::Guard;
pub use protocol::constants::{
    CONTEXT_SENTINEL, DEFAULT_ENDPOINT, DEFAULT_MESSAGE, HASH_MAX_LEN, REPORTER_AGENT,
    TIMESTAMP_FORMAT,
};
pub use protocol::hash::{clamp as clamp_hash, default_hash};
pub use protocol::severity;
pub use protocol::types::{
    ApplicationInfo, ErrorDetails, ErrorReport, ErrorTrigger, Trace, TraceFrame, VisitorContext,
};
pub use reporter::{InitError, Outcome, Reporter};
pub use transport::{split_header_body, Delivery, HttpTransport, Transport, TransmitError};

// ---------------------------------------------------------------------------
// Trace capture helpers
// ---------------------------------------------------------------------------

/**
 * Captures a best-effort call-stack snapshot at the current call site.
 *
 * Returns [`Trace::Unavailable`] when the runtime resolves no usable
 * frames (stripped binaries, unsupported platforms) — capture failure is
 * a state of the report, never an error.
 */
pub fn capture_trace() -> Trace {
    let bt = backtrace::Backtrace::new();
    Trace::from_frames(convert_backtrace(&bt))
}

/**
 * Converts a `backtrace::Backtrace` into reportable frames.
 *
 * The collector requires a file path and line per frame, so frames whose
 * debug info did not resolve are skipped; a frame with a location but no
 * symbol name reports the method as `"<unknown>"`.
 */
pub fn convert_backtrace(bt: &backtrace::Backtrace) -> Vec<TraceFrame> {
    let mut frames = Vec::new();

    for frame in bt.frames() {
        for symbol in frame.symbols() {
            let (filepath, line) = match (symbol.filename(), symbol.lineno()) {
                (Some(path), Some(line)) => (path.display().to_string(), line),
                _ => continue,
            };

            let method = symbol
                .name()
                .map(|name| name.to_string())
                .unwrap_or_else(|| "<unknown>".to_string());

            frames.push(TraceFrame {
                filepath,
                line,
                method,
            });
        }
    }

    frames
}
