//! Hierarchical, level-filtered, subsystem-filtered diagnostics.
//!
//! A [`Logger`] can be attached to any [`Loggable`] (a `Project`, a
//! `Circuit`, an `Element` — anything the `dls-core` crate exposes).
//! Attaching to a loggable propagates the same logger down to every
//! child loggable it currently owns. Attachment is a point-in-time
//! fan-out, not a live subscription, so a loggable added after
//! `attach_logger` was called stays unlogged until the next attach.
//!
//! Records are filtered on two axes before they ever reach a sink:
//! a minimum [`Level`], and an optional subsystem allow-list expressed
//! as a regular expression. The actual sink is `tracing`; this crate
//! does not implement its own formatting or I/O, it only decides
//! whether and at what tracing level to emit.

mod level;
mod logger;

pub use level::Level;
pub use logger::Logger;

/// Something a [`Logger`] can be attached to.
///
/// Implementors own an `Option<Logger>` slot and a list of child
/// loggables that attachment/detachment must propagate to.
pub trait Loggable {
    /// Mutable access to this loggable's own logger slot.
    fn logger_slot(&mut self) -> &mut Option<Logger>;

    /// Read access to this loggable's own logger, if attached.
    fn logger(&self) -> Option<&Logger>;

    /// Child loggables that attach/detach must propagate into.
    ///
    /// Default: no children (a leaf loggable, e.g. a single `Element`).
    fn children_mut(&mut self) -> Vec<&mut dyn Loggable> {
        Vec::new()
    }

    /// Attach `logger` to this loggable and every current child.
    fn attach_logger(&mut self, logger: Logger) {
        for child in self.children_mut() {
            child.attach_logger(logger.clone());
        }
        *self.logger_slot() = Some(logger);
    }

    /// Detach whatever logger is attached here and on every current child.
    fn detach_logger(&mut self) {
        for child in self.children_mut() {
            child.detach_logger();
        }
        *self.logger_slot() = None;
    }

    /// Emit a record through the attached logger, if any and if it
    /// passes that logger's level/subsystem filters.
    fn log(&self, level: Level, subsystem: &str, message: &str) {
        if let Some(logger) = self.logger() {
            logger.emit(level, subsystem, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf {
        logger: Option<Logger>,
    }

    impl Loggable for Leaf {
        fn logger_slot(&mut self) -> &mut Option<Logger> {
            &mut self.logger
        }
        fn logger(&self) -> Option<&Logger> {
            self.logger.as_ref()
        }
    }

    struct Branch {
        logger: Option<Logger>,
        children: Vec<Leaf>,
    }

    impl Loggable for Branch {
        fn logger_slot(&mut self) -> &mut Option<Logger> {
            &mut self.logger
        }
        fn logger(&self) -> Option<&Logger> {
            self.logger.as_ref()
        }
        fn children_mut(&mut self) -> Vec<&mut dyn Loggable> {
            self.children
                .iter_mut()
                .map(|c| c as &mut dyn Loggable)
                .collect()
        }
    }

    #[test]
    fn attach_propagates_to_children() {
        let mut branch = Branch {
            logger: None,
            children: vec![Leaf { logger: None }, Leaf { logger: None }],
        };
        branch.attach_logger(Logger::new(Level::Info));
        assert!(branch.logger().is_some());
        assert!(branch.children[0].logger().is_some());
        assert!(branch.children[1].logger().is_some());
    }

    #[test]
    fn detach_propagates_to_children() {
        let mut branch = Branch {
            logger: None,
            children: vec![Leaf { logger: None }],
        };
        branch.attach_logger(Logger::new(Level::Trace));
        branch.detach_logger();
        assert!(branch.logger().is_none());
        assert!(branch.children[0].logger().is_none());
    }

    #[test]
    fn child_added_after_attach_is_not_retroactively_logged() {
        let mut branch = Branch {
            logger: None,
            children: vec![],
        };
        branch.attach_logger(Logger::new(Level::Info));
        branch.children.push(Leaf { logger: None });
        assert!(branch.children[0].logger().is_none());
    }
}
