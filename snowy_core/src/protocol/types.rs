/**
 * Core type definitions for the Snowy Rust SDK.
 *
 * These structures mirror the report schema expected by the Snowy Evening
 * collector 1:1. The outermost value is `ErrorReport`, POSTed as the whole
 * request body:
 *
 * ```json
 * {
 *   "project_id": 103,
 *   "application": {"name": "My App", "version": "1.0", "build": "2364"},
 *   "error": {"timestamp": "2026-08-07 12:00:00", "message": "...",
 *             "filepath": "/app/index", "line": 42,
 *             "type": "User Warning", "number": 512},
 *   "trace": [{"filepath": "...", "line": 10, "method": "..."}],
 *   "visitor": {"visitor_ip": "N/A", "referrer_url": "N/A",
 *               "request_uri": "N/A", "user_agent": "N/A"},
 *   "hash": "d7c7ee36..."
 * }
 * ```
 *
 * Two schema quirks worth naming:
 * - `error.filepath` / `error.line` serialize as explicit `null` when the
 *   trigger had no source location; the keys are never dropped.
 * - `trace` is either a non-empty frame array or the literal `false` —
 *   the collector treats `false` as "no trace captured", and an empty
 *   array is not a valid state.
 */
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::protocol::constants::DEFAULT_MESSAGE;

// ---------------------------------------------------------------------------
// ErrorTrigger — the raw input that starts report construction
// ---------------------------------------------------------------------------

/**
 * A single error event as signaled by the host runtime.
 *
 * This is the builder's input, created per event and discarded after the
 * report is assembled. Everything except `code` may be absent:
 * - `code == 0` is the no-op gate — such triggers produce no report.
 * - A missing `message` is replaced with [`DEFAULT_MESSAGE`].
 * - `file` / `line` pass through as `null` in the report when absent.
 */
#[derive(Clone, Debug)]
pub struct ErrorTrigger {
    /// Numeric severity code. Zero means "nothing happened" — no report.
    pub code: u32,

    /// Human-readable description of the error.
    pub message: Option<String>,

    /// Source file the error originated from.
    pub file: Option<String>,

    /// Line number within `file`.
    pub line: Option<u32>,
}

impl ErrorTrigger {
    /**
     * Builds a fully-populated trigger — the common case where the host
     * supplies all four values.
     */
    pub fn new(code: u32, message: &str, file: &str, line: u32) -> Self {
        Self {
            code,
            message: Some(message.to_string()),
            file: Some(file.to_string()),
            line: Some(line),
        }
    }

    /**
     * Builds a bare trigger carrying only a severity code.
     */
    pub fn from_code(code: u32) -> Self {
        Self {
            code,
            message: None,
            file: None,
            line: None,
        }
    }

    /// The message to report: the trigger's own, or the generic placeholder.
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
    }
}

// ---------------------------------------------------------------------------
// ApplicationInfo
// ---------------------------------------------------------------------------

/**
 * Static description of the reporting application, from configuration.
 * Serialized verbatim under the report's `application` key.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// Display name — also the leading component of the default
    /// deduplication hash.
    pub name: String,

    /// Version string, e.g. `"1.0"`.
    pub version: String,

    /// Build identifier, e.g. `"2364"`.
    pub build: String,
}

impl ApplicationInfo {
    pub fn new(name: &str, version: &str, build: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            build: build.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorDetails — the `error` block of the report
// ---------------------------------------------------------------------------

/**
 * The `error` block: when and where the error happened, plus its
 * severity in both raw (`number`) and cataloged (`type`) form.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Build-time UTC timestamp, formatted `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,

    /// The (possibly defaulted) trigger message.
    pub message: String,

    /// Originating source path; `null` on the wire when unknown.
    pub filepath: Option<String>,

    /// Originating line; `null` on the wire when unknown.
    pub line: Option<u32>,

    /// Category label from the severity catalog.
    #[serde(rename = "type")]
    pub error_type: String,

    /// The raw severity code as received.
    pub number: u32,
}

// ---------------------------------------------------------------------------
// Trace — call-stack snapshot, or an explicit "no trace" marker
// ---------------------------------------------------------------------------

/**
 * One call-stack entry captured at the moment of the trigger.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Source file of the call site.
    pub filepath: String,

    /// Line number of the call site.
    pub line: u32,

    /// Function or method name at the call site.
    pub method: String,
}

/**
 * Best-effort call-stack snapshot.
 *
 * The two states the collector distinguishes:
 * - `Captured(frames)` — capture worked and found usable frames;
 *   serializes as a frame array.
 * - `Unavailable` — the runtime could not supply a stack (or resolved
 *   nothing usable); serializes as the literal `false`.
 *
 * "Captured but empty" is not a state — [`Trace::from_frames`] collapses
 * an empty capture to `Unavailable` so `[]` never reaches the wire.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trace {
    Captured(Vec<TraceFrame>),
    Unavailable,
}

impl Trace {
    /**
     * Wraps captured frames, folding an empty capture into `Unavailable`.
     */
    pub fn from_frames(frames: Vec<TraceFrame>) -> Self {
        if frames.is_empty() {
            Trace::Unavailable
        } else {
            Trace::Captured(frames)
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Trace::Unavailable)
    }
}

impl Serialize for Trace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Trace::Captured(frames) => frames.serialize(serializer),
            Trace::Unavailable => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Trace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TraceVisitor;

        impl<'de> Visitor<'de> for TraceVisitor {
            type Value = Trace;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a list of trace frames or the literal `false`")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Trace, E>
            where
                E: serde::de::Error,
            {
                if value {
                    Err(E::custom("`true` is not a valid trace marker"))
                } else {
                    Ok(Trace::Unavailable)
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Trace, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut frames = Vec::new();
                while let Some(frame) = seq.next_element::<TraceFrame>()? {
                    frames.push(frame);
                }
                Ok(Trace::from_frames(frames))
            }
        }

        deserializer.deserialize_any(TraceVisitor)
    }
}

// ---------------------------------------------------------------------------
// VisitorContext — ambient request context
// ---------------------------------------------------------------------------

/**
 * Ambient request context attached to every report.
 *
 * Each field is independently optional at the source but always present
 * on the wire: values the ambient lookup cannot supply are reported as
 * the `"N/A"` sentinel (see [`crate::context`]).
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorContext {
    pub visitor_ip: String,
    pub referrer_url: String,
    pub request_uri: String,
    pub user_agent: String,
}

impl Default for VisitorContext {
    /// All fields at the sentinel — the context of a trigger with no
    /// ambient request at all.
    fn default() -> Self {
        use crate::protocol::constants::CONTEXT_SENTINEL;
        Self {
            visitor_ip: CONTEXT_SENTINEL.to_string(),
            referrer_url: CONTEXT_SENTINEL.to_string(),
            request_uri: CONTEXT_SENTINEL.to_string(),
            user_agent: CONTEXT_SENTINEL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorReport — the serialized payload
// ---------------------------------------------------------------------------

/**
 * The complete report POSTed to the collector.
 *
 * Immutable once built: constructed fresh per trigger by the
 * [`crate::builder::ReportBuilder`], serialized immediately, and
 * discarded after transmission. Field declaration order matches the
 * collector schema.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Target project, from static configuration.
    pub project_id: u64,

    /// Static description of the reporting application.
    pub application: ApplicationInfo,

    /// When/where/what of the error itself.
    pub error: ErrorDetails,

    /// Call-stack snapshot, or the explicit `false` marker.
    pub trace: Trace,

    /// Ambient request context, sentinel-filled when unavailable.
    pub visitor: VisitorContext,

    /// Deduplication fingerprint, at most 255 characters.
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report(trace: Trace) -> ErrorReport {
        ErrorReport {
            project_id: 103,
            application: ApplicationInfo::new("My App", "1.0", "2364"),
            error: ErrorDetails {
                timestamp: "2026-08-07 12:00:00".to_string(),
                message: "Test error".to_string(),
                filepath: Some("/app/index".to_string()),
                line: Some(42),
                error_type: "User Warning".to_string(),
                number: 512,
            },
            trace,
            visitor: VisitorContext::default(),
            hash: "d7c7ee36aed23f33fbb5ae5f56eb3848890d52d3".to_string(),
        }
    }

    /**
     * An absent trace serializes as the literal `false`, never `[]`.
     */
    #[test]
    fn test_trace_unavailable_serializes_as_false() {
        let report = sample_report(Trace::Unavailable);
        let value = serde_json::to_value(&report).expect("report must serialize");
        assert_eq!(value["trace"], json!(false));
    }

    /**
     * A captured trace serializes as an array of frame objects.
     */
    #[test]
    fn test_trace_frames_serialize_as_array() {
        let report = sample_report(Trace::from_frames(vec![TraceFrame {
            filepath: "/app/index".to_string(),
            line: 10,
            method: "handle_request".to_string(),
        }]));
        let value = serde_json::to_value(&report).expect("report must serialize");
        assert_eq!(
            value["trace"],
            json!([{"filepath": "/app/index", "line": 10, "method": "handle_request"}])
        );
    }

    /**
     * An empty capture collapses to the `false` marker — `[]` is not a
     * representable state.
     */
    #[test]
    fn test_empty_capture_is_unavailable() {
        assert!(Trace::from_frames(Vec::new()).is_unavailable());
    }

    /**
     * Absent source location serializes as explicit nulls; the keys stay.
     */
    #[test]
    fn test_absent_location_serializes_as_null() {
        let mut report = sample_report(Trace::Unavailable);
        report.error.filepath = None;
        report.error.line = None;

        let value = serde_json::to_value(&report).expect("report must serialize");
        assert_eq!(value["error"]["filepath"], json!(null));
        assert_eq!(value["error"]["line"], json!(null));
    }

    /**
     * The severity label travels under the `type` key, the raw code under
     * `number`, and the default visitor context is all sentinels.
     */
    #[test]
    fn test_wire_field_names() {
        let value =
            serde_json::to_value(sample_report(Trace::Unavailable)).expect("report must serialize");
        assert_eq!(value["error"]["type"], json!("User Warning"));
        assert_eq!(value["error"]["number"], json!(512));
        assert_eq!(value["visitor"]["visitor_ip"], json!("N/A"));
        assert_eq!(value["visitor"]["referrer_url"], json!("N/A"));
        assert_eq!(value["visitor"]["request_uri"], json!("N/A"));
        assert_eq!(value["visitor"]["user_agent"], json!("N/A"));
    }

    /**
     * Serializing a report and parsing it back yields a structurally
     * equal value, for both trace states.
     */
    #[test]
    fn test_round_trip() {
        for trace in [
            Trace::Unavailable,
            Trace::from_frames(vec![TraceFrame {
                filepath: "/srv/app.rs".to_string(),
                line: 7,
                method: "main".to_string(),
            }]),
        ] {
            let report = sample_report(trace);
            let text = serde_json::to_string(&report).expect("report must serialize");
            let parsed: ErrorReport = serde_json::from_str(&text).expect("report must parse back");
            assert_eq!(parsed, report);
        }
    }

    /**
     * `true` is rejected when parsing a trace — only `false` marks absence.
     */
    #[test]
    fn test_trace_rejects_true() {
        assert!(serde_json::from_str::<Trace>("true").is_err());
        assert_eq!(
            serde_json::from_str::<Trace>("false").expect("false is the absence marker"),
            Trace::Unavailable
        );
    }
}
