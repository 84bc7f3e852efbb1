/**
 * Caller-facing adapter: the callback API on top of the core `Client`.
 *
 * Callback rules:
 * - Network path: the callback fires exactly once, never inline with the
 *   call, always through the `MainScheduler`, whichever thread the worker
 *   finished on.
 * - Local rejection (`report_event` with an empty app ID, API key, or
 *   contact ID): the callback fires with `false` synchronously, before the
 *   call returns, without the scheduler and without a request.
 *
 * `register_token` has no local rejection path.
 *
 * A process-wide instance can be installed with `PushReportingClient::init`;
 * the crate-level free functions route through it.
 */
use std::sync::{Arc, OnceLock};

use crate::client::{Client, Options};
use crate::completion::Completion;
use crate::error::InitError;
use crate::scheduler::{CallbackThread, MainScheduler};

// ---------------------------------------------------------------------------
// Global singleton
// ---------------------------------------------------------------------------

/**
 * Process-wide instance behind the crate-level free functions.
 *
 * `OnceLock` ensures `init()` can only succeed once.
 */
static GLOBAL_CLIENT: OnceLock<PushReportingClient> = OnceLock::new();

/// Returns the global client, or `None` if `init()` has not been called.
pub fn get_client() -> Option<&'static PushReportingClient> {
    GLOBAL_CLIENT.get()
}

// ---------------------------------------------------------------------------
// PushReportingClient
// ---------------------------------------------------------------------------

pub struct PushReportingClient {
    client: Client,
    scheduler: Arc<dyn MainScheduler>,
}

impl PushReportingClient {
    /**
     * Builds a client from `options`.
     *
     * Without `options.scheduler`, a `CallbackThread` is spawned and
     * callbacks run there.
     */
    pub fn new(mut options: Options) -> Result<Self, InitError> {
        let scheduler: Arc<dyn MainScheduler> = match options.scheduler.take() {
            Some(scheduler) => scheduler,
            None => Arc::new(CallbackThread::spawn()?),
        };

        Ok(Self {
            client: Client::new(options)?,
            scheduler,
        })
    }

    /**
     * Builds a client and installs it as the global instance.
     *
     * Returns `Err(InitError::AlreadyInitialized)` on a second call; the
     * early check avoids spawning threads in that case.
     */
    pub fn init(options: Options) -> Result<(), InitError> {
        if GLOBAL_CLIENT.get().is_some() {
            return Err(InitError::AlreadyInitialized);
        }

        let client = Self::new(options)?;

        GLOBAL_CLIENT
            .set(client)
            .map_err(|_| InitError::AlreadyInitialized)
    }

    /// The underlying completion-based client.
    pub fn core(&self) -> &Client {
        &self.client
    }

    /**
     * Registers a device token with the backend.
     *
     * `on_complete(true)` iff the server answered `{"success": true}`.
     * Every other outcome (transport failure, unreadable body, missing or
     * non-boolean `success`, `success: false`) yields `on_complete(false)`.
     *
     * # Arguments
     * * `two_step_field` / `two_step_value`: sent as `two_steps_data` only
     *   when both are `Some`.
     */
    pub fn register_token<F>(
        &self,
        app_id: &str,
        api_key: &str,
        two_step_field: Option<&str>,
        two_step_value: Option<&str>,
        token: &str,
        on_complete: F,
    ) where
        F: FnOnce(bool) + Send + 'static,
    {
        let completion =
            self.client
                .register_token(app_id, api_key, two_step_field, two_step_value, token);
        self.deliver(completion, on_complete);
    }

    /**
     * Reports a push engagement event (e.g. `"open"`) for one delivery.
     *
     * An empty `app_id`, `api_key`, or `contact_id` is rejected on the spot:
     * the reason is logged and `on_complete(false)` runs before this returns.
     */
    #[allow(clippy::too_many_arguments)]
    pub fn report_event<F>(
        &self,
        app_id: &str,
        api_key: &str,
        contact_id: &str,
        message_hash: &str,
        mailing_id: i64,
        event: &str,
        on_complete: F,
    ) where
        F: FnOnce(bool) + Send + 'static,
    {
        match self
            .client
            .report_event(app_id, api_key, contact_id, message_hash, mailing_id, event)
        {
            Ok(completion) => self.deliver(completion, on_complete),
            Err(_) => on_complete(false),
        }
    }

    /// See `Client::flush`. Callbacks for flushed requests are posted, not
    /// necessarily run, by the time this returns.
    pub fn flush(&self) -> bool {
        self.client.flush()
    }

    fn deliver<F>(&self, completion: Completion, on_complete: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let scheduler = self.scheduler.clone();
        completion.on_resolved(move |result| {
            scheduler.post(Box::new(move || on_complete(result)));
        });
    }
}
