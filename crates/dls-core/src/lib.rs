//! Headless digital-logic simulation core.
//!
//! Owns the bit-string value type, the bus/element graph, the
//! event-driven propagation scheduler, the bidirectional splitter
//! algorithm, and the canonical element semantics (gates, flip-flops,
//! latches, memories, subcircuits, adders, muxes). File-format loaders,
//! log sinks, and the client-facing CLI live outside this crate; it
//! only exposes the graph shape a loader must build and the `run`
//! entry point a client calls.

pub mod bitvalue;
pub mod bus;
pub mod circuit;
pub mod config;
pub mod element;
pub mod error;
pub mod project;
pub mod scheduler;

pub use bitvalue::BitValue;
pub use bus::{propagate_widths, BusId, BusNet};
pub use circuit::{Circuit, HaltPredicate, RunInputs, RunOutputs, RunResult, RunShape};
pub use config::SimulationConfig;
pub use element::{Element, ElementId, ElementKind};
pub use error::{SimError, SimResult};
pub use project::Project;
pub use scheduler::Scheduler;

pub use dls_log::{Level, Loggable, Logger};
