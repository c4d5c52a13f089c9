/**
 * Minimal walkthrough for the Snowy Rust SDK.
 *
 * Fill in the credentials from your project's settings page (or export
 * SNOWY_ORG / SNOWY_API_KEY / SNOWY_PROJECT_ID / SNOWY_ENDPOINT), then:
 *
 *   cargo run -p snowy_demo
 *   cargo run -p snowy_demo -- --panic      # test panic capture
 *   cargo run -p snowy_demo -- --detached   # background delivery
 *
 * RUST_LOG=debug shows the SDK's internal diagnostics.
 */
use snowy::{ApplicationInfo, Config, ErrorTrigger, Options, Outcome, Trace, VisitorContext};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let test_panic = args.iter().any(|a| a == "--panic");
    let detached = args.iter().any(|a| a == "--detached");

    /*
     * Static configuration: credentials, project, application identity.
     * Environment variables override the placeholders so the demo can
     * run against a real or local collector.
     */
    let mut config = Config::new(
        &env_or("SNOWY_ORG", "botsko"),
        &env_or("SNOWY_API_KEY", "20c49a711426788d6f91"),
        env_or("SNOWY_PROJECT_ID", "103").parse().unwrap_or(103),
        ApplicationInfo::new("My App", "1.0", "2364"),
    );
    if let Ok(endpoint) = std::env::var("SNOWY_ENDPOINT") {
        config = config.with_endpoint(&endpoint);
    }

    let guard = snowy::init(
        config,
        Options {
            detached,
            ..Default::default()
        },
    )
    .expect("SDK configuration should be valid");
    let reporter = guard.reporter();

    /*
     * Raise an application-level warning, the way a host error hook
     * would. In synchronous mode the outcome is the collector's answer.
     */
    match reporter.raise(512, "Demo user warning", file!(), line!()) {
        Outcome::Delivered(delivery) => {
            println!("[demo] collector answered HTTP {}: {}", delivery.status, delivery.body);
        }
        Outcome::Queued => println!("[demo] report queued for background delivery"),
        other => println!("[demo] outcome: {other:?}"),
    }

    /*
     * Code 0 is the no-op gate — nothing is built or sent.
     */
    let skipped = reporter.raise(0, "never reported", file!(), line!());
    println!("[demo] code 0 outcome: {skipped:?}");

    /*
     * Custom deduplication: group by a stable key instead of
     * application/file/line.
     */
    let trigger = ErrorTrigger::new(256, "Invoice renderer failed", file!(), line!());
    let outcome = reporter.report_with_hash(
        &trigger,
        VisitorContext::default(),
        Trace::Unavailable,
        "billing/invoice-renderer",
    );
    println!("[demo] custom-hash outcome: {outcome:?}");

    /*
     * Test panic capture if requested. The panic hook reports the panic
     * before the process aborts.
     */
    if test_panic {
        println!("[demo] triggering a panic...");
        panic!("Demo panic from the Snowy example");
    }

    println!("[demo] done; pending reports flush when the guard drops");
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
