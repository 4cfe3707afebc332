//! [`Circuit`]: owns a [`BusNet`] and a flat arena of [`Element`]s, and
//! drives the [`Scheduler`]'s propagation loop on `run`.
//!
//! A label index keyed by string for named ports, a flat element arena
//! keyed by integer id, and a `run` entry point that seeds external
//! state and drains an event queue to a fixed point rather than
//! walking the graph recursively.

use std::collections::HashMap;

use dls_log::{Level, Loggable, Logger};

use crate::bitvalue::BitValue;
use crate::bus::{BusId, BusNet};
use crate::config::SimulationConfig;
use crate::element::{Element, ElementId, ElementKind, MemoryState};
use crate::error::{SimError, SimResult};
use crate::scheduler::Scheduler;

/// Either a literal `BitValue` or an already-parsed one — `run`'s input
/// map accepts whichever a caller has on hand.
pub type RunInputs = RunShape<BitValue>;
/// Mirrors the shape of whatever `RunInputs` was supplied with.
pub type RunOutputs = RunShape<Option<BitValue>>;

/// Either a label → value map, or a positional list matching the
/// circuit's labeled-input declaration order. `run`'s output shape
/// mirrors whichever variant its input used.
#[derive(Debug, Clone)]
pub enum RunShape<T> {
    Labeled(HashMap<String, T>),
    Positional(Vec<T>),
}

/// Cooperative termination check for a clocked run: given whether the
/// clock is currently high and the number of full cycles completed so
/// far, return `true` to stop. Required whenever the circuit contains
/// at least one `Clock` element — an unconditionally-running clocked
/// circuit would never stabilize on its own.
pub type HaltPredicate<'a> = dyn FnMut(bool, u64) -> bool + 'a;

/// The result of a `Circuit::run` call: the requested outputs, the
/// total propagation delay incurred, and the number of scheduler steps
/// taken.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub outputs: RunOutputs,
    pub propagation_delay: u64,
    pub steps: u64,
}

/// An element plus the bus ids its ports occupy, addressable by label
/// for inputs, outputs, and memory-bearing elements, and by id for
/// everything else.
pub struct Circuit {
    config: SimulationConfig,
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
    buses: BusNet,
    scheduler: Scheduler,
    next_element_id: u64,
    labels: HashMap<String, ElementId>,
    input_labels: Vec<String>,
    output_labels: Vec<String>,
    memory_labels: Vec<String>,
    clock_ids: Vec<ElementId>,
    clock_counter: u64,
    logger: Option<Logger>,
}

impl Circuit {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            elements: HashMap::new(),
            order: Vec::new(),
            buses: BusNet::new(),
            scheduler: Scheduler::new(),
            next_element_id: 0,
            labels: HashMap::new(),
            input_labels: Vec::new(),
            output_labels: Vec::new(),
            memory_labels: Vec::new(),
            clock_ids: Vec::new(),
            clock_counter: 0,
            logger: None,
        }
    }

    pub fn buses_mut(&mut self) -> &mut BusNet {
        &mut self.buses
    }

    pub fn buses(&self) -> &BusNet {
        &self.buses
    }

    pub fn allocate_element_id(&mut self) -> ElementId {
        let id = ElementId(self.next_element_id);
        self.next_element_id += 1;
        id
    }

    /// Add a fully-constructed element to the circuit, attaching it to
    /// every bus it watches. Fails with `DuplicateLabel` if its label
    /// collides with an already-registered one. An element that was
    /// built with neither a kind-specific default delay nor an explicit
    /// `with_delay` override picks up `SimulationConfig::default_delay`
    /// here, at registration time.
    pub fn add_element(&mut self, mut element: Element) -> SimResult<ElementId> {
        if element.uses_default_delay() {
            element.delay = self.config.default_delay;
        }
        let id = element.id;
        if let Some(label) = &element.label {
            if let Some(&existing) = self.labels.get(label) {
                return Err(SimError::DuplicateLabel {
                    label: label.clone(),
                    first: existing,
                    second: id,
                });
            }
        }
        for bus in element.watched_buses() {
            self.buses.attach_element(bus, id);
        }
        if matches!(element.kind, ElementKind::Clock { .. }) {
            self.clock_ids.push(id);
        }
        if let Some(label) = &element.label {
            self.labels.insert(label.clone(), id);
        }
        self.order.push(id);
        self.elements.insert(id, element);
        Ok(id)
    }

    /// Register `id`'s label as a labeled input port, addressable by
    /// position in `run`'s `RunShape::Positional` form.
    pub fn declare_input(&mut self, label: impl Into<String>) {
        self.input_labels.push(label.into());
    }

    pub fn declare_output(&mut self, label: impl Into<String>) {
        self.output_labels.push(label.into());
    }

    pub fn declare_memory(&mut self, label: impl Into<String>) {
        self.memory_labels.push(label.into());
    }

    pub fn input_labels(&self) -> &[String] {
        &self.input_labels
    }

    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    fn element_by_label(&self, label: &str) -> SimResult<ElementId> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| SimError::BadInput(label.to_string()))
    }

    /// Drive `value` directly onto the labeled element's primary port
    /// (bypassing the clock), enqueuing every bus that changed as a
    /// result — the mechanism `run` uses to seed labeled inputs, and
    /// `Subcircuit` uses to seed its inner circuit's inputs.
    pub fn set_labeled_input(&mut self, label: &str, value: Option<BitValue>) -> SimResult<()> {
        let id = self.element_by_label(label)?;
        let Some(value) = value else {
            return Ok(());
        };
        let element = self.elements.get_mut(&id).expect("label index is stale");
        let changed = element.initialize(&mut self.buses, value, self.clock_counter)?;
        self.enqueue_changed(&changed);
        Ok(())
    }

    /// Read the current value on a labeled output element's sole input
    /// bus (an `OutputPort`'s input, or any other kind's first output
    /// for loaders that label an internal element directly).
    pub fn labeled_output_value(&self, label: &str) -> SimResult<Option<BitValue>> {
        let id = self.element_by_label(label)?;
        let element = self.elements.get(&id).expect("label index is stale");
        let bus = element
            .inputs
            .first()
            .or_else(|| element.outputs.first())
            .copied()
            .ok_or_else(|| SimError::BadInput(label.to_string()))?;
        Ok(self.buses.value(bus)?.cloned())
    }

    fn memory_state(&self, label: &str) -> SimResult<&MemoryState> {
        let id = self.element_by_label(label)?;
        match &self.elements.get(&id).expect("label index is stale").kind {
            ElementKind::Rom(state) | ElementKind::Ram(state) => Ok(state),
            _ => Err(SimError::BadInput(label.to_string())),
        }
    }

    fn memory_state_mut(&mut self, label: &str) -> SimResult<&mut MemoryState> {
        let id = self.element_by_label(label)?;
        match &mut self
            .elements
            .get_mut(&id)
            .expect("label index is stale")
            .kind
        {
            ElementKind::Rom(state) | ElementKind::Ram(state) => Ok(state),
            _ => Err(SimError::BadInput(label.to_string())),
        }
    }

    /// Direct-access read of `length` words starting at `address` on the
    /// memory-bearing element labeled `label`. Out-of-range words come
    /// back `None` rather than faulting.
    pub fn read_memory(&self, label: &str, address: u64, length: usize) -> SimResult<Vec<Option<BitValue>>> {
        let state = self.memory_state(label)?;
        let address = address as usize;
        if address + length > state.capacity() {
            self.log(
                Level::Warning,
                "memory",
                &format!("read_memory({label}) at {address}..{} exceeds capacity {}", address + length, state.capacity()),
            );
        }
        Ok(state.read_range(address, length))
    }

    /// Direct-access overwrite of `words` starting at `address` on the
    /// memory-bearing element labeled `label`. Words landing beyond
    /// capacity are dropped, with a warning logged rather than a fault.
    pub fn write_memory(&mut self, label: &str, address: u64, words: &[BitValue]) -> SimResult<()> {
        let capacity = self.memory_state(label)?.capacity();
        let address = address as usize;
        if address + words.len() > capacity {
            self.log(
                Level::Warning,
                "memory",
                &format!("write_memory({label}) at {address}..{} exceeds capacity {capacity}", address + words.len()),
            );
        }
        self.memory_state_mut(label)?.write_many(address, words)
    }

    /// Reset every element and bus to its initial, unsimulated state.
    pub fn reset(&mut self) {
        for id in &self.order {
            let element = self.elements.get_mut(id).expect("order is stale");
            let _ = element.reset(&mut self.buses);
        }
        self.buses.reset_all();
        self.scheduler.clear();
        self.clock_counter = 0;
    }

    /// Enqueue every element this circuit owns (except pure output taps,
    /// which never recompute anything) with its own delay. Used both by
    /// `run`'s step 3 and by `bootstrap`.
    fn enqueue_all(&mut self) {
        for id in &self.order {
            let element = self.elements.get(id).expect("order is stale");
            if matches!(element.kind, ElementKind::OutputPort) {
                continue;
            }
            self.scheduler.schedule(*id, element.delay);
        }
    }

    fn enqueue_changed(&mut self, changed: &[BusId]) {
        let mut seen = std::collections::HashSet::new();
        for &bus in changed {
            for &observer in self.buses.attached_elements(bus) {
                if !seen.insert(observer) {
                    continue;
                }
                let delay = self
                    .elements
                    .get(&observer)
                    .map(|e| e.delay)
                    .unwrap_or(0);
                self.scheduler.schedule(observer, self.clock_counter + delay);
            }
        }
    }

    /// Drain the scheduler to a fixed point, returning the sum of
    /// applied delays (the `now` timestamp the last step ran at, which
    /// is how `Subcircuit`'s delay contribution is measured).
    fn drain(&mut self) -> SimResult<u64> {
        let mut steps: u64 = 0;
        let mut last_time = 0;
        while let Some((time, id)) = self.scheduler.pop() {
            steps += 1;
            if steps > self.config.step_limit {
                return Err(SimError::StepLimitExceeded { steps });
            }
            last_time = time;
            self.clock_counter = self.clock_counter.max(time);
            let element = self.elements.get_mut(&id).expect("scheduled id is stale");
            let changed = element.resolve(&mut self.buses, time)?;
            // Re-enqueue every attached observer, including `id` itself
            // when it watches a bus it just changed (a splitter's own
            // narrow/wide feedback, or a literal self-loop like a ring
            // oscillator) — the step-limit boundary case depends on
            // exactly this self-triggering.
            for bus in changed {
                for &observer in self.buses.attached_elements(bus) {
                    let observer_delay = self
                        .elements
                        .get(&observer)
                        .map(|e| e.delay)
                        .unwrap_or(0);
                    self.scheduler.schedule(observer, time + observer_delay);
                }
            }
        }
        Ok(last_time)
    }

    /// Run the circuit once to stability with no external input change
    /// (used by `Subcircuit` after its inner inputs were already seeded
    /// via `set_labeled_input`). Returns the propagation delay incurred.
    pub fn run_to_stability(&mut self) -> SimResult<u64> {
        self.drain()
    }

    /// Run every unconditional element (constants, free-running clocks
    /// with no external driver) once so their outputs settle before the
    /// first externally-seeded run. Idempotent in effect — only
    /// `Subcircuit` calls this, and only once per instance.
    pub fn bootstrap(&mut self) -> SimResult<()> {
        self.enqueue_all();
        self.drain()?;
        Ok(())
    }

    fn seed_inputs(&mut self, inputs: &RunInputs) -> SimResult<()> {
        match inputs {
            RunShape::Labeled(map) => {
                for (label, value) in map {
                    self.set_labeled_input(label, Some(value.clone()))?;
                }
            }
            RunShape::Positional(values) => {
                if values.len() != self.input_labels.len() {
                    return Err(SimError::BadInput(format!(
                        "expected {} positional inputs, got {}",
                        self.input_labels.len(),
                        values.len()
                    )));
                }
                let labels = self.input_labels.clone();
                for (label, value) in labels.iter().zip(values) {
                    self.set_labeled_input(label, Some(value.clone()))?;
                }
            }
        }
        Ok(())
    }

    fn collect_outputs(&self, shape_like: &RunInputs) -> SimResult<RunOutputs> {
        match shape_like {
            RunShape::Labeled(_) => {
                let mut map = HashMap::new();
                for label in &self.output_labels {
                    map.insert(label.clone(), self.labeled_output_value(label)?);
                }
                Ok(RunShape::Labeled(map))
            }
            RunShape::Positional(_) => {
                let mut values = Vec::with_capacity(self.output_labels.len());
                for label in &self.output_labels {
                    values.push(self.labeled_output_value(label)?);
                }
                Ok(RunShape::Positional(values))
            }
        }
    }

    fn toggle_clocks(&mut self, high: bool) -> SimResult<()> {
        for &id in self.clock_ids.clone().iter() {
            let element = self.elements.get_mut(&id).expect("clock id is stale");
            if let ElementKind::Clock { high: current } = &mut element.kind {
                *current = high;
            }
            let out = element.outputs[0];
            let value = Some(BitValue::make(if high { 1 } else { 0 }, Some(1))?);
            let changed = self.buses.set_value(out, value, self.clock_counter)?;
            self.enqueue_changed(&changed);
        }
        Ok(())
    }

    /// Resolve the circuit: reset, seed labeled inputs, enqueue every
    /// element, and drain to a fixed point. If the circuit contains a
    /// `Clock` element, `halt` governs
    /// when the outer toggle-and-resolve loop stops; its absence is a
    /// `MissingHaltPredicate` error.
    pub fn run(&mut self, inputs: RunInputs, halt: Option<&mut HaltPredicate<'_>>) -> SimResult<RunResult> {
        self.reset();
        self.seed_inputs(&inputs)?;
        self.enqueue_all();
        let mut total_delay = self.drain()?;
        let mut total_steps = 0u64;

        if !self.clock_ids.is_empty() {
            let Some(halt) = halt else {
                return Err(SimError::MissingHaltPredicate);
            };
            let mut cycles: u64 = 0;
            let mut clock_high = false;
            loop {
                clock_high = !clock_high;
                self.toggle_clocks(clock_high)?;
                total_delay += self.drain()?;
                if !clock_high {
                    cycles += 1;
                }
                if halt(clock_high, cycles) {
                    break;
                }
                total_steps += 1;
                if total_steps > self.config.step_limit {
                    return Err(SimError::StepLimitExceeded { steps: total_steps });
                }
            }
        }

        let outputs = self.collect_outputs(&inputs)?;
        Ok(RunResult {
            outputs,
            propagation_delay: total_delay,
            steps: total_steps,
        })
    }
}

impl Loggable for Circuit {
    fn logger_slot(&mut self) -> &mut Option<Logger> {
        &mut self.logger
    }

    fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Loggable> {
        self.elements.values_mut().map(|e| e as &mut dyn Loggable).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{
        EdgeTrigger, FlipFlopState, GateOp, MemoryState, SplitterState, SubcircuitState, UnaryOp,
    };

    fn half_adder() -> Circuit {
        let mut circuit = Circuit::new(SimulationConfig::default());
        let bus_a = circuit.buses_mut().create_bus(1);
        let bus_b = circuit.buses_mut().create_bus(1);
        let bus_sum = circuit.buses_mut().create_bus(1);
        let bus_carry = circuit.buses_mut().create_bus(1);
        let bus_a_out = circuit.buses_mut().create_bus(1);
        let bus_b_out = circuit.buses_mut().create_bus(1);
        circuit.buses_mut().connect(bus_a, bus_a_out).unwrap();
        circuit.buses_mut().connect(bus_b, bus_b_out).unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus_a]).with_label("A"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus_b]).with_label("B"))
            .unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::Gate(GateOp::Xor), vec![bus_a_out, bus_b_out], vec![bus_sum]))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::Gate(GateOp::And), vec![bus_a_out, bus_b_out], vec![bus_carry]))
            .unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![bus_sum], vec![]).with_label("Sum"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![bus_carry], vec![]).with_label("Carry"))
            .unwrap();

        circuit.declare_input("A");
        circuit.declare_input("B");
        circuit.declare_output("Sum");
        circuit.declare_output("Carry");
        circuit
    }

    fn bit(v: i128) -> BitValue {
        BitValue::make(v, Some(1)).unwrap()
    }

    fn bit_opt(v: i128) -> Option<BitValue> {
        Some(bit(v))
    }

    fn bit_width(v: i128, width: usize) -> BitValue {
        BitValue::make(v, Some(width)).unwrap()
    }

    #[test]
    fn half_adder_truth_table() {
        let cases = [(0, 0, 0, 0), (0, 1, 1, 0), (1, 0, 1, 0), (1, 1, 0, 1)];
        for (a, b, sum, carry) in cases {
            let mut circuit = half_adder();
            let mut inputs = HashMap::new();
            inputs.insert("A".to_string(), bit(a));
            inputs.insert("B".to_string(), bit(b));
            let result = circuit.run(RunShape::Labeled(inputs), None).unwrap();
            let RunShape::Labeled(outputs) = result.outputs else {
                panic!("expected labeled outputs");
            };
            assert_eq!(outputs["Sum"], Some(bit(sum)));
            assert_eq!(outputs["Carry"], Some(bit(carry)));
        }
    }

    #[test]
    fn run_is_idempotent_with_no_clock() {
        let mut circuit = half_adder();
        let mut inputs = HashMap::new();
        inputs.insert("A".to_string(), bit(1));
        inputs.insert("B".to_string(), bit(1));
        let first = circuit.run(RunShape::Labeled(inputs.clone()), None).unwrap();
        let second = circuit.run(RunShape::Labeled(inputs), None).unwrap();
        let (RunShape::Labeled(first_out), RunShape::Labeled(second_out)) = (first.outputs, second.outputs) else {
            panic!("expected labeled outputs");
        };
        assert_eq!(first_out["Sum"], second_out["Sum"]);
        assert_eq!(first_out["Carry"], second_out["Carry"]);
    }

    #[test]
    fn positional_input_cardinality_mismatch_is_bad_input() {
        let mut circuit = half_adder();
        let err = circuit.run(RunShape::Positional(vec![bit(1)]), None);
        assert!(matches!(err, Err(SimError::BadInput(_))));
    }

    #[test]
    fn duplicate_label_rejected_at_construction() {
        let mut circuit = Circuit::new(SimulationConfig::default());
        let bus = circuit.buses_mut().create_bus(1);
        let id1 = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id1, ElementKind::InputPort, vec![], vec![bus]).with_label("X"))
            .unwrap();
        let id2 = circuit.allocate_element_id();
        let err = circuit.add_element(Element::new(id2, ElementKind::InputPort, vec![], vec![bus]).with_label("X"));
        assert!(matches!(err, Err(SimError::DuplicateLabel { .. })));
    }

    #[test]
    fn configured_default_delay_applies_to_kinds_without_their_own() {
        let mut circuit = Circuit::new(SimulationConfig::default().with_default_delay(7));
        let bus_in = circuit.buses_mut().create_bus(1);
        let bus_out = circuit.buses_mut().create_bus(1);
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::Unary(UnaryOp::Not), vec![bus_in], vec![bus_out]).with_label("inv"))
            .unwrap();
        let found = circuit.element_by_label("inv").unwrap();
        assert_eq!(circuit.elements.get(&found).unwrap().delay, 7);
    }

    #[test]
    fn explicit_delay_override_is_not_replaced_by_configured_default() {
        let mut circuit = Circuit::new(SimulationConfig::default().with_default_delay(7));
        let bus_in = circuit.buses_mut().create_bus(1);
        let bus_out = circuit.buses_mut().create_bus(1);
        let id = circuit.allocate_element_id();
        circuit
            .add_element(
                Element::new(id, ElementKind::Unary(UnaryOp::Not), vec![bus_in], vec![bus_out])
                    .with_label("inv")
                    .with_delay(3),
            )
            .unwrap();
        let found = circuit.element_by_label("inv").unwrap();
        assert_eq!(circuit.elements.get(&found).unwrap().delay, 3);
    }

    #[test]
    fn kind_specific_delay_is_not_replaced_by_configured_default() {
        let mut circuit = Circuit::new(SimulationConfig::default().with_default_delay(7));
        let bus = circuit.buses_mut().create_bus(1);
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus]).with_label("in"))
            .unwrap();
        let found = circuit.element_by_label("in").unwrap();
        assert_eq!(circuit.elements.get(&found).unwrap().delay, 0);
    }

    #[test]
    fn ring_oscillator_hits_step_limit() {
        // A NOT gate whose output bus is connected back to its own
        // input bus: once seeded with a value, every resolve flips the
        // shared net and re-triggers itself forever.
        let mut circuit = Circuit::new(SimulationConfig::default().with_step_limit(100));
        let bus_in = circuit.buses_mut().create_bus(1);
        let bus_out = circuit.buses_mut().create_bus(1);
        circuit.buses_mut().connect(bus_in, bus_out).unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus_in]).with_label("seed"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::Unary(UnaryOp::Not), vec![bus_in], vec![bus_out]))
            .unwrap();
        circuit.declare_input("seed");

        let mut inputs = HashMap::new();
        inputs.insert("seed".to_string(), bit(0));
        let err = circuit.run(RunShape::Labeled(inputs), None);
        assert!(matches!(err, Err(SimError::StepLimitExceeded { .. })));
    }

    fn build_d_flip_flop() -> Circuit {
        let mut circuit = Circuit::new(SimulationConfig::default());
        let clk = circuit.buses_mut().create_bus(1);
        let d = circuit.buses_mut().create_bus(1);
        let en = circuit.buses_mut().create_bus(1);
        let rst = circuit.buses_mut().create_bus(1);
        let q = circuit.buses_mut().create_bus(1);
        let qn = circuit.buses_mut().create_bus(1);

        for (label, bus) in [("CLK", clk), ("D", d), ("EN", en), ("RST", rst)] {
            let id = circuit.allocate_element_id();
            circuit
                .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus]).with_label(label))
                .unwrap();
        }

        let id = circuit.allocate_element_id();
        circuit
            .add_element(
                Element::new(
                    id,
                    ElementKind::DFlipFlop(FlipFlopState::new(EdgeTrigger::Positive)),
                    vec![clk, d, en, rst],
                    vec![q, qn],
                )
                .with_label("FF"),
            )
            .unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![q], vec![]).with_label("Q"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![qn], vec![]).with_label("Qn"))
            .unwrap();

        circuit
    }

    #[test]
    fn d_flip_flop_captures_d_on_rising_edge_and_holds_reset() {
        let mut circuit = build_d_flip_flop();
        circuit.set_labeled_input("FF", Some(bit(0))).unwrap();
        circuit.run_to_stability().unwrap();
        assert_eq!(circuit.labeled_output_value("Q").unwrap(), bit_opt(0));

        circuit.set_labeled_input("D", Some(bit(1))).unwrap();
        circuit.set_labeled_input("EN", Some(bit(1))).unwrap();
        circuit.set_labeled_input("CLK", Some(bit(0))).unwrap();
        circuit.run_to_stability().unwrap();
        assert_eq!(circuit.labeled_output_value("Q").unwrap(), bit_opt(0), "no edge yet");

        circuit.set_labeled_input("CLK", Some(bit(1))).unwrap();
        circuit.run_to_stability().unwrap();
        assert_eq!(circuit.labeled_output_value("Q").unwrap(), bit_opt(1));
        assert_eq!(circuit.labeled_output_value("Qn").unwrap(), bit_opt(0));

        let mut reset_circuit = build_d_flip_flop();
        reset_circuit.set_labeled_input("FF", Some(bit(1))).unwrap();
        reset_circuit.set_labeled_input("RST", Some(bit(1))).unwrap();
        reset_circuit.set_labeled_input("D", Some(bit(0))).unwrap();
        reset_circuit.set_labeled_input("CLK", Some(bit(0))).unwrap();
        reset_circuit.run_to_stability().unwrap();
        assert_eq!(reset_circuit.labeled_output_value("Q").unwrap(), bit_opt(1));
        reset_circuit.set_labeled_input("CLK", Some(bit(1))).unwrap();
        reset_circuit.run_to_stability().unwrap();
        assert_eq!(
            reset_circuit.labeled_output_value("Q").unwrap(),
            bit_opt(1),
            "reset holds across the edge"
        );
    }

    fn build_ram() -> Circuit {
        let mut circuit = Circuit::new(SimulationConfig::default());
        let addr = circuit.buses_mut().create_bus(2);
        let data_in = circuit.buses_mut().create_bus(2);
        let cs = circuit.buses_mut().create_bus(1);
        let oe = circuit.buses_mut().create_bus(1);
        let we = circuit.buses_mut().create_bus(1);
        let reset = circuit.buses_mut().create_bus(1);
        let data_out = circuit.buses_mut().create_bus(2);

        for (label, bus) in [("ADDR", addr), ("DIN", data_in), ("CS", cs), ("OE", oe), ("WE", we), ("RST", reset)] {
            let id = circuit.allocate_element_id();
            circuit
                .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus]).with_label(label))
                .unwrap();
        }

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(
                id,
                ElementKind::Ram(MemoryState::new(2, 2)),
                vec![addr, data_in, cs, oe, we, reset],
                vec![data_out],
            ))
            .unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![data_out], vec![]).with_label("DOUT"))
            .unwrap();

        circuit
    }

    #[test]
    fn ram_write_then_read_then_reset() {
        let mut circuit = build_ram();

        circuit.set_labeled_input("ADDR", Some(bit_width(0b01, 2))).unwrap();
        circuit.set_labeled_input("DIN", Some(bit_width(0b11, 2))).unwrap();
        circuit.set_labeled_input("CS", Some(bit(0))).unwrap();
        circuit.set_labeled_input("WE", Some(bit(0))).unwrap();
        circuit.set_labeled_input("OE", Some(bit(1))).unwrap();
        circuit.run_to_stability().unwrap();

        circuit.set_labeled_input("WE", Some(bit(1))).unwrap();
        circuit.set_labeled_input("OE", Some(bit(0))).unwrap();
        circuit.run_to_stability().unwrap();
        assert_eq!(
            circuit.labeled_output_value("DOUT").unwrap(),
            Some(BitValue::from_binary_str("11").unwrap())
        );

        circuit.set_labeled_input("RST", Some(bit(1))).unwrap();
        circuit.run_to_stability().unwrap();
        assert_eq!(
            circuit.labeled_output_value("DOUT").unwrap(),
            Some(BitValue::from_binary_str("00").unwrap())
        );
    }

    fn build_splitter() -> (Circuit, [&'static str; 3]) {
        let mut circuit = Circuit::new(SimulationConfig::default());
        let wide = circuit.buses_mut().create_bus(4);
        let narrow0 = circuit.buses_mut().create_bus(2);
        let narrow1 = circuit.buses_mut().create_bus(2);

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![wide]).with_label("W"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![narrow0]).with_label("N0"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![narrow1]).with_label("N1"))
            .unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(
                id,
                ElementKind::Splitter(SplitterState::new(wide, vec![narrow0, narrow1], vec![2, 2])),
                vec![],
                vec![],
            ))
            .unwrap();

        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![wide], vec![]).with_label("W_out"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![narrow0], vec![]).with_label("N0_out"))
            .unwrap();
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::OutputPort, vec![narrow1], vec![]).with_label("N1_out"))
            .unwrap();

        (circuit, ["W_out", "N0_out", "N1_out"])
    }

    #[test]
    fn splitter_splits_wide_bus_into_reversed_narrow_slices() {
        let (mut circuit, labels) = build_splitter();
        circuit
            .set_labeled_input("W", Some(BitValue::from_binary_str("1011").unwrap()))
            .unwrap();
        circuit.run_to_stability().unwrap();

        assert_eq!(
            circuit.labeled_output_value(labels[1]).unwrap(),
            Some(BitValue::from_binary_str("11").unwrap())
        );
        assert_eq!(
            circuit.labeled_output_value(labels[2]).unwrap(),
            Some(BitValue::from_binary_str("10").unwrap())
        );
    }

    #[test]
    fn splitter_merges_narrow_buses_into_wide() {
        let (mut circuit, labels) = build_splitter();
        circuit
            .set_labeled_input("N0", Some(BitValue::from_binary_str("11").unwrap()))
            .unwrap();
        circuit
            .set_labeled_input("N1", Some(BitValue::from_binary_str("10").unwrap()))
            .unwrap();
        circuit.run_to_stability().unwrap();

        assert_eq!(
            circuit.labeled_output_value(labels[0]).unwrap(),
            Some(BitValue::from_binary_str("1011").unwrap())
        );
    }

    #[test]
    fn extend_broadcasts_single_bit_across_output_width() {
        let mut build = || {
            let mut circuit = Circuit::new(SimulationConfig::default());
            let bit_bus = circuit.buses_mut().create_bus(1);
            let out_bus = circuit.buses_mut().create_bus(4);

            let id = circuit.allocate_element_id();
            circuit
                .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bit_bus]).with_label("bit"))
                .unwrap();
            let id = circuit.allocate_element_id();
            circuit
                .add_element(Element::new(id, ElementKind::Extend, vec![bit_bus], vec![out_bus]))
                .unwrap();
            let id = circuit.allocate_element_id();
            circuit
                .add_element(Element::new(id, ElementKind::OutputPort, vec![out_bus], vec![]).with_label("out"))
                .unwrap();
            circuit.declare_input("bit");
            circuit.declare_output("out");
            circuit
        };

        for (value, expected) in [(0, "0000"), (1, "1111")] {
            let mut circuit = build();
            let mut inputs = HashMap::new();
            inputs.insert("bit".to_string(), bit(value));
            let result = circuit.run(RunShape::Labeled(inputs), None).unwrap();
            let RunShape::Labeled(outputs) = result.outputs else {
                unreachable!("labeled inputs yield labeled outputs")
            };
            assert_eq!(outputs["out"], Some(BitValue::from_binary_str(expected).unwrap()));
        }
    }

    #[test]
    fn subcircuit_delegates_to_inner_half_adder() {
        let mut outer = Circuit::new(SimulationConfig::default());
        let outer_a = outer.buses_mut().create_bus(1);
        let outer_b = outer.buses_mut().create_bus(1);
        let outer_sum = outer.buses_mut().create_bus(1);
        let outer_carry = outer.buses_mut().create_bus(1);

        let id = outer.allocate_element_id();
        outer
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![outer_a]).with_label("A"))
            .unwrap();
        let id = outer.allocate_element_id();
        outer
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![outer_b]).with_label("B"))
            .unwrap();

        let id = outer.allocate_element_id();
        outer
            .add_element(
                Element::new(
                    id,
                    ElementKind::Subcircuit(SubcircuitState::new(
                        half_adder(),
                        vec!["A".to_string(), "B".to_string()],
                        vec!["Sum".to_string(), "Carry".to_string()],
                    )),
                    vec![outer_a, outer_b],
                    vec![outer_sum, outer_carry],
                )
                .with_label("HA"),
            )
            .unwrap();

        let id = outer.allocate_element_id();
        outer
            .add_element(Element::new(id, ElementKind::OutputPort, vec![outer_sum], vec![]).with_label("Sum"))
            .unwrap();
        let id = outer.allocate_element_id();
        outer
            .add_element(Element::new(id, ElementKind::OutputPort, vec![outer_carry], vec![]).with_label("Carry"))
            .unwrap();

        outer.declare_input("A");
        outer.declare_input("B");
        outer.declare_output("Sum");
        outer.declare_output("Carry");

        let mut inputs = HashMap::new();
        inputs.insert("A".to_string(), bit(1));
        inputs.insert("B".to_string(), bit(1));
        let result = outer.run(RunShape::Labeled(inputs), None).unwrap();
        let RunShape::Labeled(outputs) = result.outputs else {
            panic!("expected labeled outputs");
        };
        assert_eq!(outputs["Sum"], Some(bit(0)));
        assert_eq!(outputs["Carry"], Some(bit(1)));
    }
}
