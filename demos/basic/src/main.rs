/**
 * Minimal harness for the E-goi push Rust SDK.
 *
 * Replace the constants below with real values from your E-goi push app,
 * then run:
 *
 *   cargo run -p egoi_push_demo
 *   cargo run -p egoi_push_demo -- --event     # also report an "open" event
 *
 * Callbacks are delivered through a `MainQueue` that `main` drains before
 * exiting, so every result is printed even though the guard only waits for
 * the network side.
 */
use std::sync::Arc;
use std::time::Duration;

/// Paste your app ID here.
const APP_ID: &str = "PASTE_YOUR_APP_ID_HERE";

/// Paste your API key here.
const API_KEY: &str = "PASTE_YOUR_API_KEY_HERE";

/// Any device token works against a test app.
const DEVICE_TOKEN: &str = "demo-device-token";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let send_event = args.iter().any(|a| a == "--event");

    /*
     * Callbacks wait in a queue that this thread drains, the way a UI app
     * would drain it from its event loop.
     */
    let queue = Arc::new(egoi_push::MainQueue::new());
    let scheduler: Arc<dyn egoi_push::MainScheduler> = queue.clone();
    let core = egoi_push::CoreOptions {
        scheduler: Some(scheduler),
        ..Default::default()
    };

    let _guard = match egoi_push::init(core) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("[demo] Failed to initialize: {err}");
            return;
        }
    };

    egoi_push::register_token(APP_ID, API_KEY, None, None, DEVICE_TOKEN, |ok| {
        println!("[demo] Token registered: {ok}");
    });

    if send_event {
        egoi_push::report_event(APP_ID, API_KEY, "demo-contact", "demo-hash", 1, "open", |ok| {
            println!("[demo] Event reported: {ok}");
        });
    }

    /*
     * The empty contact ID is rejected before anything is sent; this
     * callback runs right here, before report_event returns.
     */
    egoi_push::report_event(APP_ID, API_KEY, "", "demo-hash", 1, "open", |ok| {
        println!("[demo] Rejected locally: {}", !ok);
    });

    if !egoi_push::flush() {
        eprintln!("[demo] Flush timed out");
    }
    while queue.run_next_timeout(Duration::from_millis(200)) {}

    println!("[demo] Done.");
}
