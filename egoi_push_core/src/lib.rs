/*!
 * E-goi Push Core: the internal SDK engine.
 *
 * Registers a device's push token with the E-goi backend and reports push
 * engagement events (e.g. notification opened). Every call resolves to a
 * single boolean, whatever went wrong underneath.
 *
 * End users should usually depend on the `egoi_push` facade crate, which
 * re-exports everything and wires up console logging.
 *
 * # Module structure
 *
 * - `protocol/`: what we send: request bodies, endpoints, response parsing
 * - `transport/`: how we deliver: `Transport` seam, `ureq` client, worker
 * - `completion`: exactly-once asynchronous result
 * - `client`: completion-based core and `Options`
 * - `reporting`: callback adapter, global instance
 * - `scheduler`: where callbacks run
 * - `logger`: where diagnostics go
 * - `guard`: RAII flush-on-drop
 */

mod client;
mod completion;
mod error;
mod guard;
mod logger;
mod protocol;
mod reporting;
mod scheduler;
mod transport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use client::{Client, Options};
pub use completion::{pair as completion_pair, Completer, Completion};
pub use error::{InitError, TransportError, ValidationError};
pub use guard::Guard;
pub use logger::{LogLogger, Logger, LOG_TARGET};
pub use protocol::constants::{API_KEY_HEADER, SDK_VERSION};
pub use protocol::endpoint::Endpoints;
pub use protocol::response::ParsedResponse;
pub use protocol::types::{EventRequest, Platform, RegistrationRequest, TwoStepsData};
pub use reporting::PushReportingClient;
pub use scheduler::{CallbackThread, MainQueue, MainScheduler, Task};
pub use transport::{HttpRequest, Transport, UreqTransport};

// ---------------------------------------------------------------------------
// Public functions
// ---------------------------------------------------------------------------

/**
 * Initializes the global client with the given options.
 *
 * Returns `Ok(Guard)` on success. The `Guard` flushes pending requests
 * when dropped: keep it alive for the duration of your app.
 *
 * Returns `Err` if a worker or callback thread cannot be spawned, or if
 * `init` was already called.
 */
pub fn init(options: Options) -> Result<Guard, InitError> {
    PushReportingClient::init(options)?;
    Ok(Guard::new())
}

/**
 * Registers a device token through the global client.
 *
 * See `PushReportingClient::register_token`. If the SDK has not been
 * initialized, `on_complete(false)` runs immediately and a warning is logged.
 */
pub fn register_token<F>(
    app_id: &str,
    api_key: &str,
    two_step_field: Option<&str>,
    two_step_value: Option<&str>,
    token: &str,
    on_complete: F,
) where
    F: FnOnce(bool) + Send + 'static,
{
    match reporting::get_client() {
        Some(client) => client.register_token(
            app_id,
            api_key,
            two_step_field,
            two_step_value,
            token,
            on_complete,
        ),
        None => reject_uninitialized(on_complete),
    }
}

/**
 * Reports a push event through the global client.
 *
 * See `PushReportingClient::report_event`. If the SDK has not been
 * initialized, `on_complete(false)` runs immediately and a warning is logged.
 */
pub fn report_event<F>(
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
    match reporting::get_client() {
        Some(client) => client.report_event(
            app_id,
            api_key,
            contact_id,
            message_hash,
            mailing_id,
            event,
            on_complete,
        ),
        None => reject_uninitialized(on_complete),
    }
}

/**
 * Manually flushes pending requests, blocking until drained or timeout.
 *
 * Normally you don't need this: the `Guard` handles it on drop.
 */
pub fn flush() -> bool {
    match reporting::get_client() {
        Some(client) => client.flush(),
        None => true,
    }
}

fn reject_uninitialized<F>(on_complete: F)
where
    F: FnOnce(bool),
{
    log::warn!(target: LOG_TARGET, "E-goi push SDK is not initialized");
    on_complete(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::http::testing::MockTransport;
    use std::sync::Arc;
    use std::time::Duration;

    /*
     * The only test in this crate that touches the global instance, so the
     * before/after-init ordering below is deterministic.
     */
    #[test]
    fn test_global_lifecycle() {
        let (tx, rx) = crossbeam_channel::unbounded();

        let before = tx.clone();
        register_token("42", "k", None, None, "tok", move |ok| before.send(ok).unwrap());
        assert_eq!(rx.try_recv(), Ok(false));
        assert!(flush());

        let queue = Arc::new(MainQueue::new());
        let transport = Arc::new(MockTransport::replying(r#"{"success": true}"#));
        let guard = init(Options {
            transport: Some(transport.clone()),
            scheduler: Some(queue.clone()),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            init(Options::default()),
            Err(InitError::AlreadyInitialized)
        ));

        let registered = tx.clone();
        register_token("42", "k", None, None, "tok", move |ok| registered.send(ok).unwrap());
        report_event("42", "k", "c", "h", 5, "open", move |ok| tx.send(ok).unwrap());

        drop(guard);
        while queue.run_next_timeout(Duration::from_millis(100)) {}

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![true, true]);
        assert_eq!(transport.requests().len(), 2);
    }
}
