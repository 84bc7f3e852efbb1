/**
 * Diagnostic logging capability.
 *
 * The client never writes to a global stream directly. It holds an
 * `Arc<dyn Logger>` and reports every diagnostic through `warn`. The default
 * `LogLogger` forwards to the `log` facade, so whatever backend the host
 * installed (or `simple_logger` via the `egoi_push` facade) picks it up.
 */

/// Log target used for every diagnostic emitted by this SDK.
pub const LOG_TARGET: &str = "egoi_push";

/// Sink for SDK diagnostics.
pub trait Logger: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to `log::warn!` under the `egoi_push` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn warn(&self, message: &str) {
        log::warn!(target: LOG_TARGET, "{message}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::Logger;

    /// Keeps every message so tests can assert on diagnostics.
    #[derive(Default)]
    pub struct RecordingLogger {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingLogger {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Logger for RecordingLogger {
        fn warn(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }
}
