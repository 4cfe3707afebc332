use std::fmt;

/// Severity of a diagnostic record, from most to least verbose.
///
/// `Fatal` is not a distinct `tracing` level (tracing only has five);
/// it is emitted at `tracing::Level::ERROR` with a `fatal = true` field
/// so existing `tracing` subscribers still see it without special-casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Level {
    /// The nearest `tracing::Level`. `Fatal` maps to `ERROR`.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warning => tracing::Level::WARN,
            Level::Error | Level::Fatal => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        };
        write!(f, "{s}")
    }
}
