/**
 * Error types.
 *
 * None of these reach the caller of `register_token` / `report_event`: every
 * failure collapses into a `false` result. They exist so the layers in
 * between can say *why* something failed, and so setup errors from `init`
 * are typed.
 */
use thiserror::Error;

/// A required identifier of an event report was empty.
///
/// The `Display` text is the exact diagnostic logged on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The app ID cannot be empty.")]
    EmptyAppId,

    #[error("The API key cannot be empty.")]
    EmptyApiKey,

    #[error("The contact ID cannot be empty.")]
    EmptyContactId,
}

/// The transport could not deliver a request or get a usable reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(crate::protocol::constants::MISSING_MESSAGE))]
pub struct TransportError {
    pub message: Option<String>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure the transport could not describe.
    pub fn without_message() -> Self {
        Self { message: None }
    }
}

/// Setup failures from `init()` / `Client::new()`.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("E-goi push SDK is already initialized")]
    AlreadyInitialized,

    #[error("failed to spawn {thread} thread: {source}")]
    ThreadSpawn {
        thread: &'static str,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::EmptyAppId.to_string(), "The app ID cannot be empty.");
        assert_eq!(ValidationError::EmptyApiKey.to_string(), "The API key cannot be empty.");
        assert_eq!(
            ValidationError::EmptyContactId.to_string(),
            "The contact ID cannot be empty."
        );
    }

    #[test]
    fn test_transport_error_placeholder() {
        assert_eq!(TransportError::new("timed out").to_string(), "timed out");
        assert_eq!(TransportError::without_message().to_string(), "---");
    }

    #[test]
    fn test_init_error_names_the_thread() {
        let err = InitError::ThreadSpawn {
            thread: "worker",
            source: std::io::Error::other("no threads left"),
        };
        assert_eq!(err.to_string(), "failed to spawn worker thread: no threads left");
        assert!(std::error::Error::source(&err).is_some());
    }
}
