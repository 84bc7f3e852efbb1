/**
 * SDK-wide constants.
 *
 * Defaults for the backend endpoints and the names that appear on the wire.
 */

/// Default base URL of the push wrapper API. Every request goes to
/// `{DEFAULT_BASE_URL}/{app_id}/{path}`.
pub const DEFAULT_BASE_URL: &str = "https://push-wrapper.egoiapp.com/apps";

/// Default path segment for token registration.
pub const DEFAULT_REGISTER_PATH: &str = "token";

/// Default path segment for event reports.
pub const DEFAULT_EVENT_PATH: &str = "event";

/// Header carrying the client API key on every request.
pub const API_KEY_HEADER: &str = "ApiKey";

/// Placeholder used in diagnostics when the transport gives no message.
pub const MISSING_MESSAGE: &str = "---";

/// SDK version string sent as the `User-Agent`.
/// Derived at compile time from the `egoi_push_core` package version.
pub const SDK_VERSION: &str = concat!("egoi-push-rust/", env!("CARGO_PKG_VERSION"));
