/**
 * Background worker thread that drains the request queue, executes each
 * request through the `Transport`, and resolves its completion.
 *
 * Architecture overview:
 *
 * ```text
 *  ┌─────────────┐     bounded channel     ┌────────────────┐
 *  │  Caller      │ ───── WorkerMsg ──────► │  Worker thread  │
 *  │  (any thread)│                         │  (single)       │
 *  └──────▲──────┘                         └───────┬────────┘
 *         │                                        │ Transport::send()
 *         │          Completer::complete(bool)     │ ParsedResponse
 *         └────────────────────────────────────────┘
 * ```
 *
 * The channel carries `WorkerMsg` variants:
 * - `Request(Job)`: a built request plus the completer for its result.
 * - `Flush(Completer)`: resolved `true` by the worker once all preceding
 *   requests have resolved.
 *
 * The worker loop runs until the channel disconnects (i.e., all senders
 * are dropped), which happens when the `Client` is dropped.
 */
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;

use super::http::{HttpRequest, Transport};
use crate::completion::Completer;
use crate::error::InitError;
use crate::logger::Logger;
use crate::protocol::response::ParsedResponse;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Which operation a job belongs to. Only affects the failure diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Registration,
    Event,
}

impl RequestKind {
    fn failure_context(&self) -> &'static str {
        match self {
            RequestKind::Registration => "Error sending token to server",
            RequestKind::Event => "Error sending request to server",
        }
    }
}

/// One request in flight: what to send and where the answer goes.
#[derive(Debug)]
pub struct Job {
    pub kind: RequestKind,
    pub request: HttpRequest,
    pub completer: Completer,
}

// ---------------------------------------------------------------------------
// WorkerMsg: the messages sent through the bounded channel
// ---------------------------------------------------------------------------

/**
 * Messages that flow through the bounded channel from calling threads
 * to the single background worker.
 */
pub enum WorkerMsg {
    Request(Job),

    /**
     * A flush request. The worker completes it once all messages that were
     * in the channel *before* this `Flush` message have been processed.
     */
    Flush(Completer),
}

// ---------------------------------------------------------------------------
// Worker: the background thread
// ---------------------------------------------------------------------------

/**
 * Handle to the background worker thread.
 *
 * Processes messages sequentially, one request in flight at a time:
 * - `Request` → `Transport::send` → interpret → `Completer::complete`.
 * - `Flush` → complete the flush, all prior requests having resolved.
 */
pub struct Worker;

impl Worker {
    /**
     * Spawns the background worker thread.
     *
     * Fire-and-forget: no join handle is stored. The thread ends when the
     * owning `Client` (the last sender) is dropped.
     */
    pub fn spawn(
        receiver: Receiver<WorkerMsg>,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn Logger>,
    ) -> Result<(), InitError> {
        thread::Builder::new()
            .name("egoi-push-worker".into())
            .spawn(move || {
                Self::run_loop(&receiver, transport.as_ref(), logger.as_ref());
            })
            .map(|_| ())
            .map_err(|source| InitError::ThreadSpawn {
                thread: "worker",
                source,
            })
    }

    fn run_loop(receiver: &Receiver<WorkerMsg>, transport: &dyn Transport, logger: &dyn Logger) {
        while let Ok(msg) = receiver.recv() {
            match msg {
                WorkerMsg::Request(job) => Self::execute(job, transport, logger),
                WorkerMsg::Flush(completer) => completer.complete(true),
            }
        }
    }

    /**
     * Runs a single job to completion.
     *
     * Only transport failures are logged. Malformed bodies and
     * `"success": false` resolve `false` silently. A panicking transport
     * is logged and resolves `false`; the worker keeps running.
     */
    pub(crate) fn execute(job: Job, transport: &dyn Transport, logger: &dyn Logger) {
        let Job {
            kind,
            request,
            completer,
        } = job;

        let sent = panic::catch_unwind(AssertUnwindSafe(|| transport.send(&request)));

        let success = match sent {
            Ok(Ok(bytes)) => ParsedResponse::from_bytes(&bytes).is_success(),
            Ok(Err(err)) => {
                logger.warn(&format!("{}: {err}", kind.failure_context()));
                false
            }
            Err(_) => {
                logger.warn("Transport panicked while sending a request");
                false
            }
        };

        completer.complete(success);
    }
}
