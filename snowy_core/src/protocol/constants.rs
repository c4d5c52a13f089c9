/**
 * SDK-wide constants.
 *
 * Values baked into every report and into the HTTP exchange with the
 * Snowy Evening collector.
 */

/// Reporter identification sent as the `User-Agent` header on every POST.
/// Derived at compile time from the `snowy_core` package version in `Cargo.toml`.
pub const REPORTER_AGENT: &str = concat!("snowy-rust/", env!("CARGO_PKG_VERSION"));

/// The hosted collector endpoint. Self-hosted or development collectors
/// are configured via `Config::endpoint`.
pub const DEFAULT_ENDPOINT: &str = "https://snowy-evening.com/api/integration/error_log/";

/// Message substituted when a trigger arrives without one.
pub const DEFAULT_MESSAGE: &str = "An unidentified error occurred.";

/// Sentinel for visitor context values the ambient lookup cannot supply.
/// The collector expects every visitor field to be present, so missing
/// values are reported as this string rather than omitted.
pub const CONTEXT_SENTINEL: &str = "N/A";

/// UTC timestamp format the collector expects: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Upper bound on the deduplication hash accepted by the collector.
/// Caller-supplied hashes longer than this are clamped.
pub const HASH_MAX_LEN: usize = 255;
