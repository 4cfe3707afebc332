//! Hierarchical instantiation: a `Subcircuit` element wraps an inner
//! `Circuit` and presents its labeled inputs and outputs as ordinary
//! bus ports, behind a flat positional argument/return list.

use crate::error::SimResult;

use super::Maybe;

/// An inner circuit plus the positional mapping between its labeled
/// inputs/outputs and the outer element's `inputs`/`outputs` bus lists.
pub struct SubcircuitState {
    inner: Box<crate::circuit::Circuit>,
    input_labels: Vec<String>,
    output_labels: Vec<String>,
    /// Whether the inner circuit's unconditional elements (constants,
    /// power/ground rails) have had their one-time initial propagation
    /// run yet. Without this, a subcircuit whose inner graph never
    /// receives an external input change (e.g. it is driven entirely by
    /// a `Constant`) would never resolve its own outputs.
    bootstrapped: bool,
}

impl SubcircuitState {
    pub fn new(
        inner: crate::circuit::Circuit,
        input_labels: Vec<String>,
        output_labels: Vec<String>,
    ) -> Self {
        Self {
            inner: Box::new(inner),
            input_labels,
            output_labels,
            bootstrapped: false,
        }
    }

    /// Feed `inputs` onto the inner circuit's labeled input elements
    /// (positionally matching `input_labels`), run it to stability, and
    /// read back its labeled outputs (positionally matching
    /// `output_labels`), alongside the propagation delay the inner run
    /// incurred — the outer element's delay is the sum of the inner
    /// resolution's delay.
    pub fn resolve(&mut self, inputs: Vec<Maybe>) -> SimResult<(Vec<Maybe>, u64)> {
        if !self.bootstrapped {
            self.inner.bootstrap()?;
            self.bootstrapped = true;
        }
        for (label, value) in self.input_labels.iter().zip(inputs) {
            self.inner.set_labeled_input(label, value)?;
        }
        let delay = self.inner.run_to_stability()?;
        let outputs = self
            .output_labels
            .iter()
            .map(|label| self.inner.labeled_output_value(label))
            .collect::<SimResult<Vec<_>>>()?;
        Ok((outputs, delay))
    }

    pub fn reset(&mut self) {
        self.inner.reset();
        self.bootstrapped = false;
    }
}
