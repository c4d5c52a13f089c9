/*!
 * HTTP transport — delivers serialized reports to the collector.
 *
 * Uses `ureq` — a pure-Rust blocking HTTP client with no async runtime.
 * The send is synchronous by contract: the caller observes the delivery
 * outcome before proceeding, and a configurable request timeout bounds
 * how long that wait can last.
 *
 * Delivery rules:
 * - **Exactly one attempt** per call. Retrying, buffering, or dropping on
 *   failure is the caller's decision; this layer only reports what
 *   happened.
 * - **No uncaught failure.** Serialization problems, connection errors,
 *   and timeouts all come back as [`TransmitError`] values — nothing
 *   escapes `send` as a panic.
 * - **Any completed exchange is a result**, including collector-side
 *   error statuses. HTTP 500 is a [`Delivery`], not a [`TransmitError`].
 */

use base64::Engine as _;
use thiserror::Error;
use ureq::Agent;

use crate::config::Config;
use crate::protocol::constants::REPORTER_AGENT;
use crate::protocol::types::ErrorReport;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/**
 * A completed HTTP exchange with the collector.
 *
 * `header` is the response head — status line followed by the header
 * lines; `body` is everything after the blank-line delimiter. Callers
 * inspecting the outcome usually only care about `status`, but the raw
 * blocks are preserved for diagnostics.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// HTTP status code of the response.
    pub status: u16,

    /// Status line and header lines of the response.
    pub header: String,

    /// Response body text.
    pub body: String,
}

impl Delivery {
    /// True when the collector accepted the report (2xx).
    pub fn accepted(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/**
 * Why a send could not complete.
 *
 * `Encoding` is raised before any network activity; `Transport` covers
 * connection errors, timeouts, and malformed exchanges below the HTTP
 * layer. Neither is retried here.
 */
#[derive(Debug, Error)]
pub enum TransmitError {
    /// The report could not be serialized to JSON.
    #[error("failed to encode report as JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The request could not be completed at the transport level.
    #[error("failed to deliver report: {0}")]
    Transport(#[from] ureq::Error),
}

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/**
 * A delivery strategy for built reports.
 *
 * The production implementation is [`HttpTransport`]; the seam exists so
 * hosts can substitute an alternate strategy (capture-only for tests,
 * write-to-disk, a different wire client) without touching the report
 * builder or the reporter wiring.
 */
pub trait Transport: Send + Sync {
    /// Attempts delivery of one report, exactly once.
    fn send(&self, report: &ErrorReport) -> Result<Delivery, TransmitError>;
}

// ---------------------------------------------------------------------------
// Header/body split
// ---------------------------------------------------------------------------

/**
 * Splits a raw HTTP exchange text into its header and body blocks.
 *
 * Blocks are delimited by the first blank line, `\r\n\r\n` per HTTP
 * framing (a bare `\n\n` is tolerated). A response with no delimiter is
 * treated as all body with an empty header — malformed framing must not
 * turn into a failure.
 */
pub fn split_header_body(raw: &str) -> (String, String) {
    if let Some((header, body)) = raw.split_once("\r\n\r\n") {
        (header.to_string(), body.to_string())
    } else if let Some((header, body)) = raw.split_once("\n\n") {
        (header.to_string(), body.to_string())
    } else {
        (String::new(), raw.to_string())
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/**
 * The production transport: one authenticated POST per report.
 *
 * Construction captures everything static — the configured endpoint, the
 * pre-computed basic-auth header, and a `ureq::Agent` with the configured
 * timeouts. Sending borrows `&self` only, so one transport serves any
 * number of threads.
 */
pub struct HttpTransport {
    agent: Agent,
    endpoint: String,
    authorization: String,
}

impl HttpTransport {
    /**
     * Creates a transport for the configured collector.
     *
     * Timeouts come from the config (connect and total-per-request);
     * non-2xx statuses are surfaced as responses rather than `ureq`
     * errors so the caller sees the collector's answer either way.
     */
    pub fn new(config: &Config) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(config.connect_timeout))
            .timeout_global(Some(config.request_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            endpoint: config.endpoint.clone(),
            authorization: basic_auth(&config.org_id, &config.api_key),
        }
    }
}

impl Transport for HttpTransport {
    /**
     * Serializes the report and POSTs it to the collector.
     *
     * The payload travels as a single request body with
     * `Content-Type: application/json` and a `Content-Length` matching
     * its byte length. The response is reassembled into raw exchange
     * text and split into header/body blocks.
     */
    fn send(&self, report: &ErrorReport) -> Result<Delivery, TransmitError> {
        /*
         * Serialize first: an encoding failure must surface as
         * TransmitError::Encoding without touching the network.
         */
        let payload = serde_json::to_vec(report)?;

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .header("Content-Length", &payload.len().to_string())
            .header("User-Agent", REPORTER_AGENT)
            .send(&payload[..])?;

        /*
         * Reassemble the exchange the way it framed on the wire: status
         * line, header lines, blank line, body. The split below then
         * yields the header/body blocks, with the no-delimiter fallback
         * applying to degenerate responses.
         */
        let status = response.status();
        let mut head = format!("{:?} {status}", response.version());
        for (name, value) in response.headers() {
            head.push_str("\r\n");
            head.push_str(name.as_str());
            head.push_str(": ");
            head.push_str(value.to_str().unwrap_or("<non-text value>"));
        }

        let body = response.into_body().read_to_string()?;

        let (header, body) = split_header_body(&format!("{head}\r\n\r\n{body}"));
        Ok(Delivery {
            status: status.as_u16(),
            header,
            body,
        })
    }
}

/**
 * Builds the `Authorization` header value for HTTP basic auth:
 * `Basic base64(org_id:api_key)`.
 */
fn basic_auth(org_id: &str, api_key: &str) -> String {
    let credentials =
        base64::engine::general_purpose::STANDARD.encode(format!("{org_id}:{api_key}"));
    format!("Basic {credentials}")
}
