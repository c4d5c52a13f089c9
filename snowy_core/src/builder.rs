/**
 * Report Builder — turns a raw trigger into a fully-populated report.
 *
 * The builder is the first half of the pipeline:
 *
 * ```text
 * trigger ──► ReportBuilder::build ──► ErrorReport ──► Transport::send
 * ```
 *
 * It is stateless between calls and performs no I/O: the only inputs are
 * the trigger, the visitor context, the trace, and the static
 * configuration captured at construction; the only output is the report
 * value. Concurrent triggers may build reports on any number of threads
 * without coordination.
 */
use chrono::Utc;

use crate::config::Config;
use crate::protocol::constants::TIMESTAMP_FORMAT;
use crate::protocol::types::{
    ApplicationInfo, ErrorDetails, ErrorReport, ErrorTrigger, Trace, VisitorContext,
};
use crate::protocol::{hash, severity};

// ---------------------------------------------------------------------------
// ReportBuilder
// ---------------------------------------------------------------------------

/**
 * Assembles [`ErrorReport`] values from triggers.
 *
 * Holds the static per-project slice of the configuration (project id and
 * application description); everything per-event arrives as arguments.
 */
#[derive(Clone, Debug)]
pub struct ReportBuilder {
    project_id: u64,
    application: ApplicationInfo,
}

impl ReportBuilder {
    /**
     * Creates a builder for the configured project.
     */
    pub fn new(config: &Config) -> Self {
        Self {
            project_id: config.project_id,
            application: config.application.clone(),
        }
    }

    /**
     * Builds a report with the default deduplication hash.
     *
     * Returns `None` for the code-0 no-op trigger — the only validity
     * gate. A missing message, file, or line never prevents a report.
     */
    pub fn build(
        &self,
        trigger: &ErrorTrigger,
        visitor: VisitorContext,
        trace: Trace,
    ) -> Option<ErrorReport> {
        self.assemble(trigger, visitor, trace, None)
    }

    /**
     * Builds a report carrying a caller-supplied deduplication hash.
     *
     * The override replaces the default fingerprint verbatim, clamped to
     * the collector's 255-character bound. Use this when grouping should
     * follow something other than application/file/line — e.g. an
     * upstream error id.
     */
    pub fn build_with_hash(
        &self,
        trigger: &ErrorTrigger,
        visitor: VisitorContext,
        trace: Trace,
        hash: &str,
    ) -> Option<ErrorReport> {
        self.assemble(trigger, visitor, trace, Some(hash))
    }

    fn assemble(
        &self,
        trigger: &ErrorTrigger,
        visitor: VisitorContext,
        trace: Trace,
        hash_override: Option<&str>,
    ) -> Option<ErrorReport> {
        /*
         * The no-op gate: code 0 means "nothing happened". No report is
         * built and nothing is transmitted.
         */
        if trigger.code == 0 {
            return None;
        }

        /*
         * Severity lookup is total — uncataloged codes resolve to the
         * "Unknown" label rather than rejecting the trigger.
         */
        let error_type = severity::label(trigger.code).to_string();

        let hash = match hash_override {
            Some(custom) => hash::clamp(custom),
            None => hash::default_hash(
                &self.application.name,
                trigger.file.as_deref(),
                trigger.line,
            ),
        };

        Some(ErrorReport {
            project_id: self.project_id,
            application: self.application.clone(),
            error: ErrorDetails {
                timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
                message: trigger.message_or_default(),
                filepath: trigger.file.clone(),
                line: trigger.line,
                error_type,
                number: trigger.code,
            },
            trace,
            visitor,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::DEFAULT_MESSAGE;
    use crate::protocol::types::TraceFrame;

    fn builder() -> ReportBuilder {
        ReportBuilder::new(&Config::new(
            "botsko",
            "20c49a711426788d6f91",
            103,
            ApplicationInfo::new("My App", "1.0", "2364"),
        ))
    }

    /**
     * The code-0 gate: no report, regardless of the other fields.
     */
    #[test]
    fn test_code_zero_is_noop() {
        let trigger = ErrorTrigger::new(0, "ignored", "/app/index", 1);
        let report = builder().build(&trigger, VisitorContext::default(), Trace::Unavailable);
        assert!(report.is_none());
    }

    /**
     * The end-to-end scenario from the collector integration docs:
     * code 512 in "My App" at /app/index:42.
     */
    #[test]
    fn test_user_warning_scenario() {
        let trigger = ErrorTrigger::new(512, "Test error", "/app/index", 42);
        let report = builder()
            .build(&trigger, VisitorContext::default(), Trace::Unavailable)
            .expect("code 512 must produce a report");

        assert_eq!(report.project_id, 103);
        assert_eq!(report.application.name, "My App");
        assert_eq!(report.error.error_type, "User Warning");
        assert_eq!(report.error.number, 512);
        assert_eq!(report.error.message, "Test error");
        assert_eq!(report.error.filepath.as_deref(), Some("/app/index"));
        assert_eq!(report.error.line, Some(42));
        assert_eq!(report.hash, "d7c7ee36aed23f33fbb5ae5f56eb3848890d52d3");
        assert!(report.trace.is_unavailable());
    }

    /**
     * Uncataloged codes build a report labeled "Unknown" — they never
     * fail the handler.
     */
    #[test]
    fn test_unknown_code_builds_report() {
        let trigger = ErrorTrigger::new(777, "odd", "/app/index", 1);
        let report = builder()
            .build(&trigger, VisitorContext::default(), Trace::Unavailable)
            .expect("unknown codes still report");
        assert_eq!(report.error.error_type, "Unknown");
        assert_eq!(report.error.number, 777);
    }

    /**
     * A bare trigger gets the placeholder message and null location, and
     * the hash degrades to sha1(application name).
     */
    #[test]
    fn test_bare_trigger_defaults() {
        let trigger = ErrorTrigger::from_code(2);
        let report = builder()
            .build(&trigger, VisitorContext::default(), Trace::Unavailable)
            .expect("a bare non-zero code must report");

        assert_eq!(report.error.message, DEFAULT_MESSAGE);
        assert_eq!(report.error.filepath, None);
        assert_eq!(report.error.line, None);
        assert_eq!(report.hash, "29cec2fb1f8ce49632e079d2a145a540d972f0fa");
    }

    /**
     * Identical triggers produce identical hashes; the timestamp is the
     * only build-time-dependent field.
     */
    #[test]
    fn test_hash_is_deterministic() {
        let trigger = ErrorTrigger::new(512, "Test error", "/app/index", 42);
        let b = builder();
        let first = b
            .build(&trigger, VisitorContext::default(), Trace::Unavailable)
            .expect("report");
        let second = b
            .build(&trigger, VisitorContext::default(), Trace::Unavailable)
            .expect("report");
        assert_eq!(first.hash, second.hash);
    }

    /**
     * A custom hash is used verbatim — and clamped to 255 characters
     * when oversized.
     */
    #[test]
    fn test_hash_override() {
        let trigger = ErrorTrigger::new(512, "Test error", "/app/index", 42);
        let b = builder();

        let report = b
            .build_with_hash(
                &trigger,
                VisitorContext::default(),
                Trace::Unavailable,
                "orders-service/timeout",
            )
            .expect("report");
        assert_eq!(report.hash, "orders-service/timeout");

        let oversized = "h".repeat(400);
        let report = b
            .build_with_hash(&trigger, VisitorContext::default(), Trace::Unavailable, &oversized)
            .expect("report");
        assert_eq!(report.hash.chars().count(), 255);
    }

    /**
     * The build timestamp is UTC in `YYYY-MM-DD HH:MM:SS` form.
     */
    #[test]
    fn test_timestamp_format() {
        let trigger = ErrorTrigger::new(1, "boom", "/app/index", 1);
        let report = builder()
            .build(&trigger, VisitorContext::default(), Trace::Unavailable)
            .expect("report");

        let ts = &report.error.timestamp;
        assert_eq!(ts.len(), 19, "timestamp {ts:?} is not YYYY-MM-DD HH:MM:SS");
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[7..8], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
        assert_eq!(&ts[16..17], ":");
    }

    /**
     * Captured frames pass through untouched.
     */
    #[test]
    fn test_trace_passthrough() {
        let frames = vec![TraceFrame {
            filepath: "/app/index".to_string(),
            line: 42,
            method: "checkout".to_string(),
        }];
        let trigger = ErrorTrigger::new(512, "Test error", "/app/index", 42);
        let report = builder()
            .build(
                &trigger,
                VisitorContext::default(),
                Trace::from_frames(frames.clone()),
            )
            .expect("report");
        assert_eq!(report.trace, Trace::Captured(frames));
    }
}
