use regex::Regex;

use crate::level::Level;

/// A filtered sink handle: a minimum level plus an optional subsystem
/// allow-list. Cheap to clone (an `Arc`-free clone of a compiled regex
/// would be expensive to recompile on every attach, so `Regex` itself
/// is reference-counted internally by the `regex` crate and clones in
/// O(1)).
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: Level,
    subsystem_filter: Option<Regex>,
}

impl Logger {
    /// A logger that passes every subsystem at or above `min_level`.
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            subsystem_filter: None,
        }
    }

    /// Restrict this logger to subsystems whose name matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the `regex` crate's parse error if `pattern` is not a
    /// valid regular expression.
    pub fn with_subsystem_filter(
        mut self,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        self.subsystem_filter = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// The minimum level this logger will emit.
    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Whether `subsystem` passes this logger's allow-list (or there is none).
    pub fn allows_subsystem(&self, subsystem: &str) -> bool {
        match &self.subsystem_filter {
            Some(re) => re.is_match(subsystem),
            None => true,
        }
    }

    /// Whether a record at `level` on `subsystem` would actually be emitted.
    pub fn passes(&self, level: Level, subsystem: &str) -> bool {
        level >= self.min_level && self.allows_subsystem(subsystem)
    }

    /// Emit a record if it passes this logger's filters.
    pub fn emit(&self, level: Level, subsystem: &str, message: &str) {
        if !self.passes(level, subsystem) {
            return;
        }
        match level {
            Level::Trace => tracing::trace!(subsystem, "{message}"),
            Level::Debug => tracing::debug!(subsystem, "{message}"),
            Level::Info => tracing::info!(subsystem, "{message}"),
            Level::Warning => tracing::warn!(subsystem, "{message}"),
            Level::Error => tracing::error!(subsystem, "{message}"),
            Level::Fatal => tracing::error!(subsystem, fatal = true, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_blocks_below_minimum() {
        let logger = Logger::new(Level::Warning);
        assert!(!logger.passes(Level::Info, "scheduler"));
        assert!(logger.passes(Level::Error, "scheduler"));
    }

    #[test]
    fn subsystem_filter_restricts_by_regex() {
        let logger = Logger::new(Level::Trace)
            .with_subsystem_filter("^splitter")
            .unwrap();
        assert!(logger.passes(Level::Trace, "splitter.bus3"));
        assert!(!logger.passes(Level::Trace, "scheduler"));
    }

    #[test]
    fn no_subsystem_filter_allows_everything() {
        let logger = Logger::new(Level::Trace);
        assert!(logger.allows_subsystem("anything"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = Logger::new(Level::Trace).with_subsystem_filter("(unclosed");
        assert!(err.is_err());
    }
}
