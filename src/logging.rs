//! Logger initialisation for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialises the global logger.
///
/// `verbose` lowers the default filter to `debug`; otherwise only info level
/// and above are shown. `RUST_LOG` still takes precedence either way.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init only fails when a logger is already installed; tests call
    // init repeatedly, so that case is ignored.
    let _ = Builder::from_env(Env::default().default_filter_or(default_level.to_string()))
        .format_timestamp_millis()
        .try_init();
}
