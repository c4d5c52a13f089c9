/**
 * Ambient visitor context lookup.
 *
 * Reports carry a `visitor` block describing the request that triggered
 * the error: client address, referrer, request path, client agent. Where
 * those values come from depends entirely on the host — a CGI-style
 * process environment, a web framework's request object, or nothing at
 * all for a batch job.
 *
 * The SDK treats the source as a plain key/value lookup with a
 * default-on-missing contract: `lookup` never fails, it answers the
 * caller's default when the key is absent. Missing values therefore reach
 * the collector as the `"N/A"` sentinel instead of being dropped from the
 * payload.
 */
use std::collections::HashMap;

use crate::protocol::constants::CONTEXT_SENTINEL;
use crate::protocol::types::VisitorContext;

// ---------------------------------------------------------------------------
// Lookup keys
// ---------------------------------------------------------------------------

/// Client address key, CGI convention.
pub const KEY_REMOTE_ADDR: &str = "REMOTE_ADDR";

/// Referrer URL key, CGI convention.
pub const KEY_HTTP_REFERER: &str = "HTTP_REFERER";

/// Request path key, CGI convention.
pub const KEY_REQUEST_URI: &str = "REQUEST_URI";

/// Client agent string key, CGI convention.
pub const KEY_HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";

// ---------------------------------------------------------------------------
// ContextSource
// ---------------------------------------------------------------------------

/**
 * A key/value source of ambient request values.
 *
 * Implementations must be infallible: a missing key answers `default`,
 * never an error. The reporter queries the source once per trigger.
 */
pub trait ContextSource: Send + Sync {
    /// Returns the value for `key`, or `default` when the source has none.
    fn lookup(&self, key: &str, default: &str) -> String;
}

/**
 * Reads ambient values from the process environment.
 *
 * Under CGI-style hosting the request metadata lives in environment
 * variables named exactly like the lookup keys above; everywhere else
 * the lookups simply miss and the sentinel defaults apply. This is the
 * reporter's default source.
 */
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSource;

impl ContextSource for EnvSource {
    fn lookup(&self, key: &str, default: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| default.to_string())
    }
}

/**
 * Map-backed source for hosts that collect request metadata themselves
 * (and for tests).
 */
impl ContextSource for HashMap<String, String> {
    fn lookup(&self, key: &str, default: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| default.to_string())
    }
}

// ---------------------------------------------------------------------------
// VisitorContext construction
// ---------------------------------------------------------------------------

impl VisitorContext {
    /**
     * Builds the visitor block by querying a source for the four ambient
     * keys. Every miss yields the `"N/A"` sentinel, so the block is
     * always fully populated.
     */
    pub fn from_source(source: &dyn ContextSource) -> Self {
        Self {
            visitor_ip: source.lookup(KEY_REMOTE_ADDR, CONTEXT_SENTINEL),
            referrer_url: source.lookup(KEY_HTTP_REFERER, CONTEXT_SENTINEL),
            request_uri: source.lookup(KEY_REQUEST_URI, CONTEXT_SENTINEL),
            user_agent: source.lookup(KEY_HTTP_USER_AGENT, CONTEXT_SENTINEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /**
     * Present keys come through verbatim, absent ones as the sentinel —
     * each field independently.
     */
    #[test]
    fn test_partial_context() {
        let mut values = HashMap::new();
        values.insert(KEY_REMOTE_ADDR.to_string(), "203.0.113.7".to_string());
        values.insert(KEY_REQUEST_URI.to_string(), "/checkout".to_string());

        let visitor = VisitorContext::from_source(&values);
        assert_eq!(visitor.visitor_ip, "203.0.113.7");
        assert_eq!(visitor.request_uri, "/checkout");
        assert_eq!(visitor.referrer_url, CONTEXT_SENTINEL);
        assert_eq!(visitor.user_agent, CONTEXT_SENTINEL);
    }

    /**
     * An empty source produces the all-sentinel context — identical to
     * `VisitorContext::default()`.
     */
    #[test]
    fn test_empty_source_matches_default() {
        let values: HashMap<String, String> = HashMap::new();
        assert_eq!(VisitorContext::from_source(&values), VisitorContext::default());
    }

    /**
     * The lookup contract itself: missing key → caller's default.
     */
    #[test]
    fn test_lookup_default() {
        let values: HashMap<String, String> = HashMap::new();
        assert_eq!(values.lookup("NO_SUCH_KEY", "fallback"), "fallback");
    }
}
