/**
 * RAII guard returned by `egoi_push_core::init()`.
 *
 * Dropping the guard flushes the global client, so requests issued just
 * before shutdown still reach the backend and resolve:
 *
 * ```ignore
 * fn main() {
 *     let _guard = egoi_push_core::init(Default::default()).unwrap();
 *
 *     egoi_push_core::register_token("42", "KEY", None, None, "tok", |ok| {
 *         println!("registered: {ok}");
 *     });
 *
 * }   // <-- _guard is dropped here, triggering flush()
 * ```
 *
 * The flush only waits for the worker. Callbacks for the flushed requests
 * have been posted to the `MainScheduler` by then but may not have run: with
 * the default `CallbackThread` they can still be pending when `main`
 * returns. Hosts that need every callback should use a `MainQueue` and
 * drain it after the guard drops.
 *
 * If the flush times out (2 seconds), the guard drops without blocking
 * further.
 */
use crate::reporting;

/**
 * Flush-on-drop guard for the global client.
 *
 * The guard does NOT own the client: the client lives in a
 * `static OnceLock` and outlives the guard.
 */
pub struct Guard {
    _private: (),
}

impl Guard {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if let Some(client) = reporting::get_client() {
            if !client.flush() {
                client
                    .core()
                    .logger()
                    .warn("Flush timed out, some requests may not have completed");
            }
        }
    }
}
