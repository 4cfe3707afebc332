//! Simulation-wide tunables: a step limit of 1,000,000 and otherwise
//! sane defaults for delay and RNG seeding. `SimulationConfig` is a
//! plain struct with builder methods (`with_*` setters returning
//! `Self`) rather than a derive-heavy options struct.

/// Tunable knobs for a [`crate::circuit::Circuit`]'s resolve loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Scheduler steps allowed before a run fails with `StepLimitExceeded`.
    pub step_limit: u64,
    /// Propagation delay assumed for an element that was constructed
    /// without an explicit one and has no kind-specific default; applied
    /// by `Circuit::add_element`.
    pub default_delay: u64,
    /// Default seed a loader should hand to a `Random` element's RNG
    /// when a circuit description doesn't specify its own. `Circuit`
    /// itself never constructs a `Random` element, so this field is
    /// read by loaders, not by the core resolve loop.
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_limit: 1_000_000,
            default_delay: 1,
            rng_seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn with_default_delay(mut self, delay: u64) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}
