//! Logging bootstrap for hosting applications.
//!
//! Level selection lives in [`env_filter`] so hosts composing their own
//! subscriber stack can reuse it; [`init`] wires it into the standard `fmt`
//! subscriber. Re-initialisation is tolerated: the first subscriber wins.

use tracing_subscriber::EnvFilter;

use crate::settings::DoodleSettings;

/// Installs the global `fmt` subscriber at the requested level.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .try_init();
}

/// [`init`] with the level taken from the settings file.
pub fn init_from_settings(settings: &DoodleSettings) {
    init(settings.debug_logging);
}

/// Filter for the requested logging mode. With `debug` set the default level
/// is `debug` and `RUST_LOG` may override it; otherwise the level is pinned
/// to `info` even when the variable is set.
pub fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    }
}
