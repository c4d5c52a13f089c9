/**
 * The reporter — wires the report builder, the transport, and the
 * ambient context source into one value the host owns.
 *
 * There is no process-wide singleton: the host constructs a `Reporter`
 * from an explicit [`Config`], usually wraps it in an `Arc`, and installs
 * [`Reporter::handler`] wherever its runtime signals errors. Multiple
 * independent reporters (different projects, different collectors) can
 * coexist in one process.
 *
 * Two delivery modes:
 * - [`Reporter::new`] — synchronous: `raise`/`report` block on the POST
 *   and return the observed outcome. This is the default contract.
 * - [`Reporter::detached`] — background: reports are queued to a worker
 *   thread and the call returns immediately; [`Reporter::flush`] (or the
 *   [`crate::guard::Guard`]) drains the queue before exit.
 *
 * The reporter is re-entrancy safe in the sense that matters for an
 * error handler: it holds no mutable state, so concurrent triggers from
 * any number of threads proceed independently.
 */
use std::sync::Arc;

use thiserror::Error;

use crate::builder::ReportBuilder;
use crate::config::{Config, ConfigError};
use crate::context::{ContextSource, EnvSource};
use crate::protocol::types::{ErrorReport, ErrorTrigger, Trace, VisitorContext};
use crate::transport::{Delivery, Dispatcher, HttpTransport, Transport, TransmitError};

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/**
 * Why a reporter could not be constructed.
 */
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn delivery worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

/**
 * What happened to one trigger.
 *
 * Synchronous mode yields `Skipped`, `Delivered`, or `Failed`; detached
 * mode yields `Skipped`, `Queued`, or `Dropped`. The reporter never
 * retries — what to do with a `Failed` or `Dropped` outcome is the
 * caller's decision.
 */
#[derive(Debug)]
pub enum Outcome {
    /// The trigger carried code 0 — no report was built, nothing was sent.
    Skipped,

    /// The collector exchange completed; the response is attached
    /// (including collector-side error statuses).
    Delivered(Delivery),

    /// The report could not be encoded or the request could not complete.
    Failed(TransmitError),

    /// Detached mode: the report was handed to the delivery worker.
    Queued,

    /// Detached mode: the queue was full or the worker is gone; the
    /// report was discarded.
    Dropped,
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/**
 * One configured reporting pipeline: builder → transport.
 */
pub struct Reporter {
    builder: ReportBuilder,
    transport: Arc<dyn Transport>,
    dispatcher: Option<Dispatcher>,
    context: Box<dyn ContextSource>,
}

impl Reporter {
    /**
     * Creates a synchronous reporter for the configured collector.
     *
     * Ambient visitor context defaults to the process environment
     * ([`EnvSource`]); see [`Reporter::with_context_source`].
     */
    pub fn new(config: Config) -> Result<Self, InitError> {
        config.validate()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config));
        Ok(Self {
            builder: ReportBuilder::new(&config),
            transport,
            dispatcher: None,
            context: Box::new(EnvSource),
        })
    }

    /**
     * Creates a detached reporter: triggers enqueue their reports on a
     * bounded channel drained by a background worker, and the erroring
     * thread does not wait for the collector.
     */
    pub fn detached(config: Config) -> Result<Self, InitError> {
        config.validate()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config));
        let dispatcher = Dispatcher::spawn(transport.clone())?;
        Ok(Self {
            builder: ReportBuilder::new(&config),
            transport,
            dispatcher: Some(dispatcher),
            context: Box::new(EnvSource),
        })
    }

    /**
     * Creates a synchronous reporter delivering through a caller-supplied
     * transport instead of the HTTP one — alternate delivery strategies
     * plug in here without touching the builder.
     */
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, InitError> {
        config.validate()?;
        Ok(Self {
            builder: ReportBuilder::new(&config),
            transport,
            dispatcher: None,
            context: Box::new(EnvSource),
        })
    }

    /**
     * Replaces the ambient context source — hosts that carry request
     * metadata themselves (web frameworks, embedded runtimes) supply
     * their own lookup here.
     */
    pub fn with_context_source(mut self, source: Box<dyn ContextSource>) -> Self {
        self.context = source;
        self
    }

    /**
     * Raises an error — the trigger interface.
     *
     * Mirrors how a host runtime signals errors: severity code, message,
     * source file, line. Visitor context is looked up from the configured
     * source and a best-effort backtrace is captured at the call site.
     *
     * Code 0 is the no-op gate: nothing is built or sent.
     */
    pub fn raise(&self, code: u32, message: &str, file: &str, line: u32) -> Outcome {
        /*
         * Gate before capture: a code-0 trigger must not pay for the
         * context lookup or the backtrace. The builder applies the same
         * gate on the full-control paths.
         */
        if code == 0 {
            return Outcome::Skipped;
        }

        let trigger = ErrorTrigger::new(code, message, file, line);
        self.report(&trigger, self.visitor_context(), crate::capture_trace())
    }

    /**
     * The visitor block as the configured ambient source currently sees
     * it. Addons building their own triggers read the context here.
     */
    pub fn visitor_context(&self) -> VisitorContext {
        VisitorContext::from_source(self.context.as_ref())
    }

    /**
     * Reports a pre-assembled trigger with explicit context and trace.
     */
    pub fn report(&self, trigger: &ErrorTrigger, visitor: VisitorContext, trace: Trace) -> Outcome {
        match self.builder.build(trigger, visitor, trace) {
            Some(report) => self.dispatch(report),
            None => Outcome::Skipped,
        }
    }

    /**
     * Like [`Reporter::report`], with a caller-supplied deduplication
     * hash replacing the default fingerprint.
     */
    pub fn report_with_hash(
        &self,
        trigger: &ErrorTrigger,
        visitor: VisitorContext,
        trace: Trace,
        hash: &str,
    ) -> Outcome {
        match self.builder.build_with_hash(trigger, visitor, trace, hash) {
            Some(report) => self.dispatch(report),
            None => Outcome::Skipped,
        }
    }

    /**
     * Returns the error-handler closure for the host to install.
     *
     * The closure owns a clone of the `Arc` and matches the trigger
     * signature `(code, message, file, line)`. Faults inside the SDK are
     * caught and logged here — a handler that is itself the error
     * handler must never let one escape into the host.
     */
    pub fn handler(self: &Arc<Self>) -> impl Fn(u32, &str, &str, u32) + Send + Sync + 'static {
        let reporter = Arc::clone(self);
        move |code, message, file, line| {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                reporter.raise(code, message, file, line)
            }));

            match outcome {
                Ok(Outcome::Failed(err)) => log::warn!("error report not delivered: {err}"),
                Ok(Outcome::Dropped) => log::warn!("error report dropped before delivery"),
                Ok(_) => {}
                Err(_) => log::error!("error handler panicked; report discarded"),
            }
        }
    }

    /**
     * Drains pending background reports, blocking until done or timeout.
     *
     * # Returns
     * `true` when the queue is drained (always, in synchronous mode);
     * `false` if the flush timed out.
     */
    pub fn flush(&self) -> bool {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.flush(),
            None => true,
        }
    }

    fn dispatch(&self, report: ErrorReport) -> Outcome {
        match &self.dispatcher {
            /*
             * Detached mode: hand off and return. The worker logs the
             * eventual outcome; there is no caller to return it to.
             */
            Some(dispatcher) => {
                if dispatcher.enqueue(report) {
                    Outcome::Queued
                } else {
                    Outcome::Dropped
                }
            }
            None => match self.transport.send(&report) {
                Ok(delivery) => Outcome::Delivered(delivery),
                Err(err) => Outcome::Failed(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::ApplicationInfo;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn config() -> Config {
        Config::new(
            "botsko",
            "20c49a711426788d6f91",
            103,
            ApplicationInfo::new("My App", "1.0", "2364"),
        )
    }

    /// Captures sent reports; optionally panics to exercise the
    /// handler's containment.
    struct RecordingTransport {
        sent: Mutex<Vec<ErrorReport>>,
        panic_on_send: bool,
    }

    impl RecordingTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                panic_on_send: false,
            })
        }

        fn panicking() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                panic_on_send: true,
            })
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().expect("lock poisoned").len()
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, report: &ErrorReport) -> Result<Delivery, TransmitError> {
            if self.panic_on_send {
                panic!("transport blew up");
            }
            self.sent.lock().expect("lock poisoned").push(report.clone());
            Ok(Delivery {
                status: 200,
                header: "HTTP/1.1 200 OK".to_string(),
                body: "OK".to_string(),
            })
        }
    }

    /**
     * Code 0 skips: no report is built and the transport never runs.
     */
    #[test]
    fn test_code_zero_never_sends() {
        let transport = RecordingTransport::new();
        let reporter = Reporter::with_transport(config(), transport.clone())
            .expect("valid config");

        let outcome = reporter.raise(0, "ignored", "/app/index", 1);
        assert!(matches!(outcome, Outcome::Skipped));
        assert_eq!(transport.sent_count(), 0);
    }

    /**
     * A non-zero trigger flows through builder and transport; the
     * delivered report carries the cataloged type and the raw code.
     */
    #[test]
    fn test_raise_delivers() {
        let transport = RecordingTransport::new();
        let reporter = Reporter::with_transport(config(), transport.clone())
            .expect("valid config");

        let outcome = reporter.raise(512, "Test error", "/app/index", 42);
        assert!(matches!(outcome, Outcome::Delivered(ref d) if d.accepted()));
        assert_eq!(transport.sent_count(), 1);

        let sent = transport.sent.lock().expect("lock poisoned");
        assert_eq!(sent[0].error.error_type, "User Warning");
        assert_eq!(sent[0].error.number, 512);
        assert_eq!(sent[0].hash, "d7c7ee36aed23f33fbb5ae5f56eb3848890d52d3");
    }

    /**
     * The configured context source feeds the report's visitor block.
     */
    #[test]
    fn test_context_source_is_used() {
        let transport = RecordingTransport::new();
        let mut values = HashMap::new();
        values.insert("REMOTE_ADDR".to_string(), "198.51.100.23".to_string());

        let reporter = Reporter::with_transport(config(), transport.clone())
            .expect("valid config")
            .with_context_source(Box::new(values));

        reporter.raise(2, "warn", "/app/index", 7);

        let sent = transport.sent.lock().expect("lock poisoned");
        assert_eq!(sent[0].visitor.visitor_ip, "198.51.100.23");
        assert_eq!(sent[0].visitor.user_agent, "N/A");
    }

    /**
     * A custom hash rides through the full pipeline verbatim.
     */
    #[test]
    fn test_report_with_hash() {
        let transport = RecordingTransport::new();
        let reporter = Reporter::with_transport(config(), transport.clone())
            .expect("valid config");

        let trigger = ErrorTrigger::new(256, "boom", "/app/index", 3);
        reporter.report_with_hash(
            &trigger,
            VisitorContext::default(),
            Trace::Unavailable,
            "billing/invoice-renderer",
        );

        let sent = transport.sent.lock().expect("lock poisoned");
        assert_eq!(sent[0].hash, "billing/invoice-renderer");
    }

    /**
     * An unreachable collector yields Outcome::Failed and the calling
     * thread survives to inspect it.
     */
    #[test]
    fn test_unreachable_collector_fails_gracefully() {
        let reporter = Reporter::new(config().with_endpoint("http://127.0.0.1:9/error-log"))
            .expect("valid config");

        let outcome = reporter.raise(1, "boom", "/app/index", 1);
        assert!(matches!(
            outcome,
            Outcome::Failed(TransmitError::Transport(_))
        ));
    }

    /**
     * The handler closure contains SDK faults: a panicking transport
     * does not propagate into the host's error path.
     */
    #[test]
    fn test_handler_contains_faults() {
        let transport = RecordingTransport::panicking();
        let reporter = Arc::new(
            Reporter::with_transport(config(), transport).expect("valid config"),
        );

        let handler = reporter.handler();
        handler(1, "boom", "/app/index", 1);
    }

    /**
     * Detached mode queues instead of delivering inline, and flush
     * drains the queue.
     */
    #[test]
    fn test_detached_reporter_queues() {
        /*
         * The collector is unreachable on purpose: detached mode must
         * still accept and drain the queue, logging the failures.
         */
        let reporter = Reporter::detached(config().with_endpoint("http://127.0.0.1:9/error-log"))
            .expect("valid config");

        let outcome = reporter.raise(2, "background warn", "/app/index", 5);
        assert!(matches!(outcome, Outcome::Queued));
        reporter.flush();
    }

    /**
     * Invalid configuration is rejected at construction, not at raise
     * time.
     */
    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.api_key.clear();
        assert!(matches!(
            Reporter::new(bad),
            Err(InitError::Config(ConfigError::EmptyApiKey))
        ));
    }
}
