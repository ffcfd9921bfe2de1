//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honours `RUST_LOG` and falls back to `info`.
pub fn init() {
    init_with_filter("info");
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still takes precedence over `default_filter`. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}
