//! The `log` module defines an interface to the crate's internal logging
//! facilities. This is not to be confused with the analysis _tables_, which
//! record model-level results.
//!
//! The module (re)exports the five logging macros: `error!`, `warn!`, `info!`,
//! `debug!` and `trace!`, where `error!` represents the highest-priority
//! messages and `trace!` the lowest. To emit a log message, simply use one of
//! these macros in your code:
//!
//! ```rust
//! use contagion::info;
//!
//! pub fn do_a_thing() {
//!     info!("A thing is being done.");
//! }
//! ```
//!
//! Logging is _disabled_ by default. Binaries enable it with:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with
//!    priority at least `level`
//!
//! The library itself never installs a logger.

use env_logger::{Builder, WriteStyle};
pub use log::{debug, error, info, trace, warn, LevelFilter};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level, installing the global logger on first use.
///
/// The global logger can only ever be installed once per process, so later
/// calls adjust the maximum level of the already-installed logger.
pub fn set_log_level(level: LevelFilter) {
    INIT_LOGGER.call_once(|| {
        Builder::new()
            .filter_level(LevelFilter::Trace)
            .write_style(WriteStyle::Auto)
            .init();
    });
    log::set_max_level(level);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_level_is_idempotent() {
        set_log_level(LevelFilter::Warn);
        assert_eq!(log::max_level(), LevelFilter::Warn);

        set_log_level(LevelFilter::Trace);
        assert_eq!(log::max_level(), LevelFilter::Trace);

        disable_logging();
        assert_eq!(log::max_level(), LevelFilter::Off);
    }
}
