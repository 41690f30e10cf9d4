//! Structured logging setup.
//!
//! Library crates log through the `log` facade; the subscriber installed
//! here forwards those records into tracing alongside the server's own
//! events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. Levels come from `RUST_LOG` and default to `info`.
///
/// # Example
///
/// ```no_run
/// #[tokio::main]
/// async fn main() {
///     sixes_server::logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log the outcome of a finished room with structured fields.
pub fn log_room_finished(room: u64, winner: &str, score_a: i32, score_b: i32) {
    tracing::info!(
        room = room,
        winner = winner,
        score_a = score_a,
        score_b = score_b,
        "Match finished"
    );
}
