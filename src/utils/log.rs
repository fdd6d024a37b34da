// src/utils/log.rs

//! Structured logging for the wavelet engine.
//!
//! The engine reports decomposition geometry, padding amounts and band
//! recycling through the `tracing` macros. Nothing is printed unless the
//! host installs a subscriber:
//!
//! ```
//! wavelift::utils::log::init_subscriber(tracing::Level::DEBUG);
//! ```
//!
//! Per-scale progress is logged at `TRACE`, whole-pyramid operations at
//! `DEBUG`.

pub use tracing::{debug, error, info, instrument, span, trace, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Initializes a global logging subscriber writing to standard error.
///
/// Call once at program start. A second call (or a call after another
/// subscriber was installed) is ignored and reported at `WARN`.
///
/// # Arguments
/// * `max_level` - The maximum level of messages to log (e.g., `Level::INFO`, `Level::DEBUG`).
pub fn init_subscriber(max_level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("a global tracing subscriber is already installed");
    }
}
