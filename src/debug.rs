//! Diagnostic output configuration.
//!
//! Components log through `tracing`. How much of that reaches the user and
//! where it goes is decided by a [`LogConfig`] handed in at construction,
//! never by inspecting the process environment. Each database turns its
//! config into its own [`Dispatch`] and runs its work under it; only the
//! binary installs a process-wide subscriber.

use tracing::level_filters::LevelFilter;
use tracing::Dispatch;

/// How chatty diagnostic output is.
///
/// Levels are cumulative: a message logged at level `n` is shown when the
/// configured level is `n` or higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only warnings and errors.
    #[default]
    Quiet,
    /// Debug output up to and including the given level.
    Level(u8),
}

impl Verbosity {
    /// Build from a repeat count such as the number of `-v` flags.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Quiet,
            n => Verbosity::Level(n - 1),
        }
    }

    /// The `tracing` filter equivalent to this verbosity.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::WARN,
            Verbosity::Level(0) => LevelFilter::INFO,
            Verbosity::Level(1) => LevelFilter::DEBUG,
            Verbosity::Level(_) => LevelFilter::TRACE,
        }
    }
}

/// Where diagnostic output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSink {
    Stdout,
    #[default]
    Stderr,
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub verbosity: Verbosity,
    pub sink: LogSink,
}

impl LogConfig {
    pub fn new(verbosity: Verbosity, sink: LogSink) -> Self {
        Self { verbosity, sink }
    }

    /// Check if messages at `level` are shown.
    pub fn is_enabled(&self, level: u8) -> bool {
        match self.verbosity {
            Verbosity::Quiet => false,
            Verbosity::Level(max) => level <= max,
        }
    }

    /// Build a dispatcher that logs according to this configuration.
    pub fn dispatch(&self) -> Dispatch {
        let builder = tracing_subscriber::fmt()
            .with_max_level(self.verbosity.level_filter())
            .with_target(true);

        match self.sink {
            LogSink::Stdout => Dispatch::new(builder.with_writer(std::io::stdout).finish()),
            LogSink::Stderr => Dispatch::new(builder.with_writer(std::io::stderr).finish()),
        }
    }

    /// Install this configuration as the process-wide `tracing` subscriber.
    ///
    /// Meant for binaries. Returns `false` if a subscriber was already
    /// installed, in which case the existing one is kept.
    pub fn init(&self) -> bool {
        tracing::dispatcher::set_global_default(self.dispatch()).is_ok()
    }
}
