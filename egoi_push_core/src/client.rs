/**
 * The core SDK client: builds requests, hands them to the background
 * worker, and returns a `Completion` for each.
 *
 * The core knows nothing about callbacks or main threads. Callers that want
 * a callback on the host's UI context go through `PushReportingClient`,
 * which wraps a `Client` and does the scheduling.
 *
 * Per-call state machine:
 *
 * ```text
 * Built → Validating ─┬─► Sent → AwaitingResponse ─┬─► Succeeded
 *                     │                             └─► Failed
 *                     └─► RejectedLocally  (report_event only)
 * ```
 */
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};

use crate::completion::{self, Completion};
use crate::error::{InitError, ValidationError};
use crate::logger::{LogLogger, Logger};
use crate::protocol::endpoint::Endpoints;
use crate::protocol::types::{EventRequest, Platform, RegistrationRequest, TwoStepsData};
use crate::scheduler::MainScheduler;
use crate::transport::http::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::transport::{HttpRequest, Job, RequestKind, Transport, UreqTransport, Worker, WorkerMsg};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/**
 * Configuration options for the SDK.
 *
 * All fields have sensible defaults via `Default`. The three `Option<Arc<..>>`
 * fields are the injection points for the collaborators:
 *
 * ```ignore
 * use std::sync::Arc;
 *
 * let queue = Arc::new(egoi_push_core::MainQueue::new());
 * let client = egoi_push_core::PushReportingClient::new(egoi_push_core::Options {
 *     endpoints: egoi_push_core::Endpoints::with_base_url("https://staging.example.com/apps"),
 *     scheduler: Some(queue.clone()),
 *     ..Default::default()
 * })?;
 * ```
 */
pub struct Options {
    /// Base URL and path segments for both endpoints.
    pub endpoints: Endpoints,

    /// Value sent in the `os` field of every body. Defaults to `Ios`.
    pub platform: Platform,

    /// Connect timeout for the default `ureq` transport.
    pub connect_timeout: Duration,

    /// Total per-request timeout for the default `ureq` transport.
    pub request_timeout: Duration,

    /// Replaces the default `ureq` transport. The timeouts above are then unused.
    pub transport: Option<Arc<dyn Transport>>,

    /// Receives every diagnostic. Defaults to `LogLogger` (the `log` facade).
    pub logger: Option<Arc<dyn Logger>>,

    /// Where callbacks run. Defaults to a dedicated `CallbackThread`.
    /// Only read by `PushReportingClient`.
    pub scheduler: Option<Arc<dyn MainScheduler>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            platform: Platform::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            transport: None,
            logger: None,
            scheduler: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal constants
// ---------------------------------------------------------------------------

/// Bounded channel capacity. When full, new requests resolve `false`.
const QUEUE_CAPACITY: usize = 100;

/// Maximum time that `flush()` will block waiting for the worker.
pub(crate) const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/**
 * Owns the sender side of the request channel and the settings every
 * request is built from. Each call is independent: nothing is cached or
 * deduplicated between calls.
 */
pub struct Client {
    endpoints: Endpoints,
    platform: Platform,
    logger: Arc<dyn Logger>,
    sender: Sender<WorkerMsg>,
}

impl Client {
    /**
     * Builds the transport, creates the bounded channel, and spawns the
     * worker thread.
     *
     * `options.scheduler` is ignored here.
     */
    pub fn new(options: Options) -> Result<Self, InitError> {
        let logger: Arc<dyn Logger> = options.logger.unwrap_or_else(|| Arc::new(LogLogger));

        let transport: Arc<dyn Transport> = match options.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(
                options.connect_timeout,
                options.request_timeout,
            )),
        };

        let (sender, receiver) = crossbeam_channel::bounded(QUEUE_CAPACITY);
        Worker::spawn(receiver, transport, logger.clone())?;

        Ok(Self {
            endpoints: options.endpoints,
            platform: options.platform,
            logger,
            sender,
        })
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /**
     * Registers a device token.
     *
     * No identifier is checked for emptiness. The two-step pair is attached
     * only when both halves are given.
     */
    pub fn register_token(
        &self,
        app_id: &str,
        api_key: &str,
        two_step_field: Option<&str>,
        two_step_value: Option<&str>,
        token: &str,
    ) -> Completion {
        self.register(RegistrationRequest {
            app_id: app_id.to_string(),
            api_key: api_key.to_string(),
            token: token.to_string(),
            two_steps_data: TwoStepsData::from_pair(two_step_field, two_step_value),
            platform: self.platform,
        })
    }

    /// Dispatches a pre-built registration.
    pub fn register(&self, request: RegistrationRequest) -> Completion {
        let http = HttpRequest {
            url: self.endpoints.register_url(&request.app_id),
            body: request.body(),
            api_key: request.api_key,
        };
        self.dispatch(RequestKind::Registration, http)
    }

    /**
     * Reports a push engagement event.
     *
     * `Err` means the request was rejected locally: an identifier was empty,
     * the reason has already gone to the logger, and nothing was sent.
     */
    pub fn report_event(
        &self,
        app_id: &str,
        api_key: &str,
        contact_id: &str,
        message_hash: &str,
        mailing_id: i64,
        event: &str,
    ) -> Result<Completion, ValidationError> {
        self.report(EventRequest {
            app_id: app_id.to_string(),
            api_key: api_key.to_string(),
            contact_id: contact_id.to_string(),
            message_hash: message_hash.to_string(),
            mailing_id,
            event: event.to_string(),
            platform: self.platform,
        })
    }

    /// Validates and dispatches a pre-built event report.
    pub fn report(&self, request: EventRequest) -> Result<Completion, ValidationError> {
        if let Err(err) = request.validate() {
            self.logger.warn(&err.to_string());
            return Err(err);
        }

        let http = HttpRequest {
            url: self.endpoints.event_url(&request.app_id),
            body: request.body(),
            api_key: request.api_key,
        };
        Ok(self.dispatch(RequestKind::Event, http))
    }

    /**
     * Blocks until every request dispatched before this call has resolved,
     * or the timeout (2 seconds) elapses.
     *
     * Returns `true` if the flush completed within the timeout. Only the
     * worker is waited on: callbacks for the flushed requests have been
     * posted to the `MainScheduler` but may not have run yet.
     */
    pub fn flush(&self) -> bool {
        let (completer, completion) = completion::pair();

        match self
            .sender
            .send_timeout(WorkerMsg::Flush(completer), FLUSH_TIMEOUT)
        {
            Ok(()) => completion.wait_timeout(FLUSH_TIMEOUT) == Some(true),
            Err(_) => false,
        }
    }

    /**
     * Non-blocking enqueue. A request that cannot be queued is dropped with
     * its completer, which resolves it `false`.
     */
    fn dispatch(&self, kind: RequestKind, request: HttpRequest) -> Completion {
        let (completer, completion) = completion::pair();
        let job = Job {
            kind,
            request,
            completer,
        };

        match self.sender.try_send(WorkerMsg::Request(job)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.logger.warn("Request queue is full, dropping request");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.logger.warn("Worker thread has shut down, dropping request");
            }
        }

        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::testing::RecordingLogger;
    use crate::transport::http::testing::MockTransport;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    const WAIT: Duration = Duration::from_secs(2);

    fn client(transport: Arc<MockTransport>, logger: Arc<RecordingLogger>) -> Client {
        Client::new(Options {
            endpoints: Endpoints {
                base_url: "base".into(),
                register_path: "register".into(),
                event_path: "event".into(),
            },
            transport: Some(transport),
            logger: Some(logger),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_register_token_builds_request() {
        let transport = Arc::new(MockTransport::replying(r#"{"success": true}"#));
        let logger = Arc::new(RecordingLogger::default());
        let client = client(transport.clone(), logger.clone());

        let completion = client.register_token("42", "k", None, None, "tok123");
        assert_eq!(completion.wait_timeout(WAIT), Some(true));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "base/42/register");
        assert_eq!(requests[0].api_key, "k");
        assert_json_eq!(requests[0].body, json!({"token": "tok123", "os": "ios"}));
        assert!(logger.messages().is_empty());
    }

    #[test]
    fn test_register_token_does_not_validate_emptiness() {
        let transport = Arc::new(MockTransport::replying(r#"{"success": true}"#));
        let client = client(transport.clone(), Arc::new(RecordingLogger::default()));

        let completion = client.register_token("", "", None, None, "");
        assert_eq!(completion.wait_timeout(WAIT), Some(true));
        assert_eq!(transport.requests()[0].url, "base//register");
    }

    #[test]
    fn test_report_event_builds_request() {
        let transport = Arc::new(MockTransport::replying(r#"{"success": true}"#));
        let client = client(transport.clone(), Arc::new(RecordingLogger::default()));

        let completion = client.report_event("42", "k", "c", "h", 5, "open").unwrap();
        assert_eq!(completion.wait_timeout(WAIT), Some(true));

        let requests = transport.requests();
        assert_eq!(requests[0].url, "base/42/event");
        assert_json_eq!(
            requests[0].body,
            json!({
                "contact": "c",
                "os": "ios",
                "message_hash": "h",
                "mailing_id": 5,
                "event": "open"
            })
        );
    }

    #[test]
    fn test_report_event_rejects_locally() {
        let transport = Arc::new(MockTransport::replying(r#"{"success": true}"#));
        let logger = Arc::new(RecordingLogger::default());
        let client = client(transport.clone(), logger.clone());

        let err = client.report_event("42", "k", "", "h", 5, "open").unwrap_err();
        assert_eq!(err, ValidationError::EmptyContactId);
        assert_eq!(logger.messages(), vec!["The contact ID cannot be empty.".to_string()]);

        assert!(client.flush());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_platform_option_reaches_the_body() {
        let transport = Arc::new(MockTransport::replying(r#"{"success": true}"#));
        let client = Client::new(Options {
            platform: Platform::Android,
            transport: Some(transport.clone()),
            logger: Some(Arc::new(RecordingLogger::default())),
            ..Default::default()
        })
        .unwrap();

        client.register_token("42", "k", None, None, "tok").wait();
        assert_eq!(transport.requests()[0].body["os"], "android");
    }

    #[test]
    fn test_flush_waits_for_pending_requests() {
        let transport = Arc::new(MockTransport::replying(r#"{"success": false}"#));
        let client = client(transport.clone(), Arc::new(RecordingLogger::default()));

        let completions: Vec<Completion> = (0..5)
            .map(|i| client.register_token("42", "k", None, None, &format!("tok{i}")))
            .collect();

        assert!(client.flush());
        for completion in completions {
            assert_eq!(completion.try_result(), Some(false));
        }
        assert_eq!(transport.requests().len(), 5);
    }

    #[test]
    fn test_dispatch_after_worker_is_gone_resolves_false() {
        let logger = Arc::new(RecordingLogger::default());
        let (sender, receiver) = crossbeam_channel::bounded(QUEUE_CAPACITY);
        drop(receiver);

        let client = Client {
            endpoints: Endpoints::default(),
            platform: Platform::Ios,
            logger: logger.clone(),
            sender,
        };

        let completion = client.register_token("42", "k", None, None, "tok");
        assert_eq!(completion.try_result(), Some(false));
        assert!(!client.flush());
        assert_eq!(
            logger.messages(),
            vec!["Worker thread has shut down, dropping request".to_string()]
        );
    }
}
