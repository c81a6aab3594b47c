#![forbid(unsafe_code)]

//! Logging setup helpers.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! application's job. With the `tracing-json` feature enabled this module
//! offers a one-call JSON subscriber for production hosts.
//!
//! Events from the reconciliation loop use the [`TARGET`] target, so
//! `RUST_LOG=tether.popup=debug` isolates them.

/// Log target used by the popup runtime.
pub const TARGET: &str = "tether.popup";

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or invalid. Returns `false`
/// if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(target: TARGET, "json subscriber installed");
    }
    installed
}
