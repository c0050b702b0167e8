//! Diagnostics for notaryos.
//!
//! Screens and toasts are the client's output and go to stdout. Everything
//! here goes to stderr: session changes at `info`, record store and storage
//! traffic at `debug`, recovered corrupt data at `warn`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much diagnostic output the `-q` / `-v` flags ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// No flag: warnings such as skipped undecodable records.
    #[default]
    Normal,
    /// `-v`: sign-ins, saves, deletes, navigation.
    Verbose,
    /// `-vv`: also per-key storage reads and timer bookkeeping.
    Trace,
}

impl Verbosity {
    /// Most detailed level that is shown.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Install the stderr subscriber for the `notaryos` target.
///
/// `RUST_LOG`, when set, replaces the filter derived from `verbosity`.
/// Later calls are no-ops.
///
/// # Examples
///
/// ```no_run
/// use notaryos::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("notaryos={}", verbosity.to_level_filter());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Keep whichever subscriber was installed first.
    let _ = subscriber.try_init();
}

/// Route warnings to the test harness's captured output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
