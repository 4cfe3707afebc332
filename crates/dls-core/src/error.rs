//! Error taxonomy for the simulation core.
//!
//! Each variant below is fatal to the operation that raised it unless
//! its doc comment says otherwise (`MemoryOutOfRange` is the one
//! recoverable case: a read out of range yields `None` and a write is
//! dropped, with the error value used only for the accompanying log
//! record).

use thiserror::Error;

use crate::bus::BusId;
use crate::element::ElementId;

/// Errors raised by the simulation core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A loader could not interpret its input file. Not raised by this
    /// crate directly; exposed so loader crates built against
    /// `dls-core` can report through the same taxonomy.
    #[error("parse error: {0}")]
    ParseError(String),

    /// A loader encountered an element kind it does not know how to
    /// construct. Not raised by this crate directly, for the same
    /// reason as `ParseError`.
    #[error("unsupported element: {0}")]
    UnsupportedElement(String),

    /// A bitwise/arithmetic/bus operation was attempted between values
    /// or buses of different widths.
    #[error("width mismatch: expected {expected}, found {found}")]
    WidthMismatch { expected: usize, found: usize },

    /// `Circuit::run` was given an input label/index that does not name
    /// a labeled input element of the circuit.
    #[error("bad input: {0}")]
    BadInput(String),

    /// A splitter's wide and narrow sides disagreed at equal timestamps.
    #[error(
        "splitter contention on element {element}: wide and narrow sides disagree at timestamp {timestamp}"
    )]
    SplitterContention { element: ElementId, timestamp: u64 },

    /// The scheduler exceeded the step limit without reaching a stable
    /// (empty-queue) state.
    #[error("step limit exceeded after {steps} steps")]
    StepLimitExceeded { steps: u64 },

    /// A memory access addressed a location outside the memory's
    /// capacity. Recoverable: reads return `None`, writes are dropped.
    #[error("memory out of range: address {address} exceeds capacity {capacity}")]
    MemoryOutOfRange { address: u64, capacity: u64 },

    /// Two elements in the same circuit were constructed with the same
    /// non-empty label.
    #[error("duplicate label {label:?} on elements {first} and {second}")]
    DuplicateLabel {
        label: String,
        first: ElementId,
        second: ElementId,
    },

    /// A bus id referenced by an element does not exist in the circuit
    /// that owns it.
    #[error("unknown bus id {0:?}")]
    UnknownBus(BusId),

    /// A circuit's labeled clocked-run loop has no halt predicate, so it
    /// would never terminate.
    #[error("circuit has clocks but no halt predicate was supplied")]
    MissingHaltPredicate,
}

pub type SimResult<T> = Result<T, SimError>;
