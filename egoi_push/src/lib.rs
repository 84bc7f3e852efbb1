/*!
 * E-goi Push: push token registration and event reporting for Rust.
 *
 * This is the main crate users should depend on. It re-exports the core
 * SDK API and wires up console logging through a single `init` call.
 *
 * # Quick start
 *
 * ```ignore
 * fn main() {
 *     let _guard = egoi_push::init(egoi_push::Options::default()).unwrap();
 *
 *     egoi_push::register_token("APP_ID", "API_KEY", None, None, "device-token", |ok| {
 *         println!("token registered: {ok}");
 *     });
 *
 *     // _guard is dropped here → flush() is called automatically
 * }
 * ```
 *
 * # With options
 *
 * ```ignore
 * let _guard = egoi_push::init(egoi_push::Options {
 *     console_logging: false,
 *     core: egoi_push::CoreOptions {
 *         platform: egoi_push::Platform::Android,
 *         ..Default::default()
 *     },
 * });
 * ```
 */

// ---------------------------------------------------------------------------
// Re-exports from egoi_push_core: the public surface area
// ---------------------------------------------------------------------------

pub use egoi_push_core::{
    flush, register_token, report_event, CallbackThread, Client, Completion, Endpoints,
    EventRequest, Guard, HttpRequest, InitError, LogLogger, Logger, MainQueue, MainScheduler,
    ParsedResponse, Platform, PushReportingClient, RegistrationRequest, Transport,
    TransportError, TwoStepsData, UreqTransport, ValidationError, LOG_TARGET, SDK_VERSION,
};

/// Options of the core crate, without the facade's addon flags.
pub use egoi_push_core::Options as CoreOptions;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/**
 * Configuration for the E-goi push SDK.
 *
 * Implements `From<CoreOptions>` so a core configuration can be passed to
 * `init()` directly. Defaults:
 * - `console_logging` = `true`
 * - `core` = `CoreOptions::default()`
 */
pub struct Options {
    /// Endpoints, platform, timeouts, injected collaborators.
    pub core: CoreOptions,

    /// Install `simple_logger` at `Warn` level so SDK diagnostics reach
    /// stderr. Skipped when the host already installed a `log` backend.
    pub console_logging: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            core: CoreOptions::default(),
            console_logging: true,
        }
    }
}

impl From<CoreOptions> for Options {
    fn from(core: CoreOptions) -> Self {
        Self {
            core,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/**
 * Initializes the E-goi push SDK.
 *
 * ```ignore
 * // Defaults: production endpoints, iOS, console logging on
 * let _guard = egoi_push::init(egoi_push::Options::default())?;
 *
 * // From core options only
 * let _guard = egoi_push::init(egoi_push::CoreOptions {
 *     endpoints: egoi_push::Endpoints::with_base_url("https://staging.example.com/apps"),
 *     ..Default::default()
 * })?;
 * ```
 *
 * # Returns
 * A `Guard`: keep it alive for the duration of your app. When it drops,
 * pending requests are flushed.
 */
pub fn init(options: impl Into<Options>) -> Result<Guard, InitError> {
    let opts = options.into();

    /*
     * Logging goes first so failures during init are visible too.
     */
    if opts.console_logging {
        install_console_logger();
    }

    egoi_push_core::init(opts.core)
}

/**
 * Installs `simple_logger` at `Warn`. If a logger is already set (by the
 * host or an earlier call), that one stays and only the max level is raised
 * to let warnings through.
 */
fn install_console_logger() {
    if simple_logger::init_with_level(log::Level::Warn).is_err()
        && log::max_level() < log::LevelFilter::Warn
    {
        log::set_max_level(log::LevelFilter::Warn);
    }
}
