//! Logging configuration for flightregistry.
//!
//! Registry operations report their outcome (loaded, added, removed, not
//! found, counted) as `info` events and load failures as `error` events. This
//! module installs the subscriber that prints them.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (info and above).
    #[default]
    Normal,
    /// Verbose output (debug and above).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Log targets enabled by default: the library and the `flightreg` binary.
const TARGETS: [&str; 2] = ["flightregistry", "flightreg"];

/// Build the filter directive used when `RUST_LOG` is not set.
#[must_use]
pub fn default_directive(verbosity: Verbosity) -> String {
    let level = verbosity.to_level_filter();
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging system.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `verbosity` when set.
///
/// # Examples
///
/// ```no_run
/// use flightregistry::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // Notifications go to stderr so exported JSON on stdout stays clean.
    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time(),
    );

    // Install the subscriber (ignore error if already set)
    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
