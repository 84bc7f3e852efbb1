/**
 * Transport layer: HTTP delivery and background worker thread.
 *
 * Everything related to *how* requests reach the push backend:
 * - `http`: the `Transport` seam and its `ureq` implementation
 * - `worker`: background thread, bounded channel, flush barrier
 */

pub mod http;
pub mod worker;

pub use http::{HttpRequest, Transport, UreqTransport};
pub use worker::{Job, RequestKind, Worker, WorkerMsg};
