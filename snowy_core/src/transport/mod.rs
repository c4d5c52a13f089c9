/**
 * Transport layer — HTTP delivery and the optional background dispatcher.
 *
 * Everything related to *how* reports reach the collector:
 * - `http` — ureq-based synchronous transport, delivery results, errors
 * - `worker` — detached delivery: bounded queue, worker thread, flush
 */

pub mod http;
pub mod worker;

pub use http::{split_header_body, Delivery, HttpTransport, Transport, TransmitError};
pub use worker::{Dispatcher, FlushSignal, WorkerMsg};
