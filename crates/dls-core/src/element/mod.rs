//! [`Element`]: a tagged-variant computation node.
//!
//! There are roughly forty element variants in a complete loader-facing
//! circuit model (gates, muxes, arithmetic, flip-flops, latches,
//! memories, the splitter, subcircuits...). `ElementKind` is one
//! discriminant enum; [`Element`] is a thin envelope carrying the
//! fields every kind shares: id, label, the input and output bus lists
//! (in the variant-specific order documented on each `ElementKind`
//! case), the propagation delay, and the attached logger.
//!
//! `resolve` and `reset` dispatch on `self.kind` rather than through a
//! trait object per variant — with ~40 cases living behind one `match`,
//! adding a new element kind touches one file instead of rippling
//! through a trait hierarchy.

pub mod arithmetic;
pub mod flipflop;
pub mod gates;
pub mod memory;
pub mod misc;
pub mod mux;
pub mod splitter;
pub mod subcircuit;

use std::fmt;

use dls_log::{Level, Loggable, Logger};
use serde::{Deserialize, Serialize};

use crate::bitvalue::BitValue;
use crate::bus::{BusId, BusNet};
use crate::error::SimResult;

pub use arithmetic::AluOp;
pub use flipflop::{DLatchMode, EdgeTrigger, FlipFlopState};
pub use gates::{GateOp, UnaryOp};
pub use memory::MemoryState;
pub use splitter::{SplitterOp, SplitterState};
pub use subcircuit::SubcircuitState;

/// Unique, per-`Circuit` element identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "elem#{}", self.0)
    }
}

/// A resolved value read from a bus: `None` stands for the "no value
/// yet" / high-impedance state, never for a zero-width value.
pub type Maybe = Option<BitValue>;

/// The discriminant of an [`Element`]. Each case documents its input
/// and output bus ordering, since `Element::inputs`/`outputs` are plain
/// `Vec<BusId>` rather than named fields.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// N-ary AND/OR/XOR/NAND/NOR/XNOR. inputs = `[a, b, ...]` (>= 2,
    /// equal width); outputs = `[result]`.
    Gate(GateOp),
    /// NOT or Buffer. inputs = `[x]`; outputs = `[y]`.
    Unary(UnaryOp),
    /// `N`-way mux. inputs = `[data_0, .., data_{n-1}, select]`;
    /// outputs = `[out]`.
    Mux { data_count: usize },
    /// `N`-way demux. inputs = `[data, select]`; outputs =
    /// `[out_0, .., out_{n-1}]`.
    Demux { output_count: usize },
    /// Binary decoder. inputs = `[in]`; outputs = `[out_0, .., out_{2^k-1}]`.
    Decoder,
    /// Priority encoder. inputs = `[data_0, .., data_{n-1}, enable]`;
    /// outputs = `[out]`.
    PriorityEncoder { input_count: usize },
    /// Single-bit selector, MSB-first. inputs = `[data, selector]`;
    /// outputs = `[bit]`.
    BitSelector,
    /// Adder with carry. inputs = `[a, b, carry_in]`; outputs =
    /// `[sum, carry_out]`.
    Adder,
    /// `not(input).add(1)` at input width. inputs = `[x]`; outputs = `[y]`.
    TwosCompliment,
    /// High-impedance buffer. inputs = `[data, control]`; outputs = `[out]`.
    TriState,
    /// Controlled inverter. inputs = `[data, control]`; outputs = `[out]`.
    ControlledInverter,
    /// Fixed output every resolve. inputs = `[]`; outputs = `[out]`.
    Constant(BitValue),
    /// Uniform random value in `[0, max_value]` on each clock rise.
    /// inputs = `[clock]`; outputs = `[out]`.
    Random(misc::RandomState),
    /// Modulo counter, synchronous reset. inputs = `[clock, reset]`;
    /// outputs = `[out, zero]`.
    Counter(misc::CounterState),
    /// 3-bit-controlled ALU. inputs = `[a, b, control]`; outputs =
    /// `[result, carry_out]`.
    Alu,
    /// Free-running clock. inputs = `[]`; outputs = `[out]`. Toggled
    /// externally by `Circuit`'s clocked-run loop, not by `resolve`.
    Clock { high: bool },
    /// Positive- or negative-edge D flip-flop. inputs = `[clock, d,
    /// enable, reset]`; outputs = `[q, q_bar]`.
    DFlipFlop(flipflop::FlipFlopState),
    /// Positive-edge T flip-flop: on the rising edge, when `enable` is
    /// high, `q := ¬t` (toggle when `t == q`, hold otherwise). inputs =
    /// `[clock, t, enable, reset]`; outputs = `[q, q_bar]`.
    TFlipFlop(flipflop::FlipFlopState),
    /// Positive-edge JK flip-flop. inputs = `[clock, j, k, reset]`;
    /// outputs = `[q, q_bar]`.
    JkFlipFlop(flipflop::JkState),
    /// Level-sensitive SR latch. inputs = `[s, r]`; outputs = `[q, q_bar]`.
    SrLatch(flipflop::LatchState),
    /// D latch (transparent-when-high, or the as-shipped
    /// rising-edge-invert quirk — see [`DLatchMode`]). inputs =
    /// `[clock, d]`; outputs = `[q, q_bar]`.
    DLatch(flipflop::DLatchState),
    /// JLS-style edge-triggered register. inputs = `[clock, d]`;
    /// outputs = `[q]`.
    Register(flipflop::RegisterState),
    /// Read-only memory. inputs = `[address, cs, oe]`; outputs = `[data_out]`.
    Rom(MemoryState),
    /// Read/write memory with chip-select, output-enable, write-enable.
    /// inputs = `[address, data_in, cs, oe, we, reset]`; outputs = `[data_out]`.
    Ram(MemoryState),
    /// Bidirectional bus splitter/merger. Owns its wide and narrow bus
    /// ids directly rather than through `Element::inputs`/`outputs`,
    /// since which side is "input" and which is "output" changes every
    /// resolve (see [`SplitterState`]).
    Splitter(SplitterState),
    /// Hierarchical instantiation of an inner `Circuit`. inputs =
    /// outer input buses (positional, matching the inner circuit's
    /// labeled inputs); outputs = outer output buses.
    Subcircuit(SubcircuitState),
    /// A circuit input pin: no inputs, one output bus. `resolve` never
    /// recomputes it; only `Element::initialize` (via
    /// `Circuit::run`/`set_labeled_input`) ever drives its value.
    InputPort,
    /// A circuit output pin: one input bus, no outputs. Exists purely
    /// as a tap `Circuit::labeled_output_value` reads through.
    OutputPort,
    /// "Make N copies": broadcasts a single input bit onto every
    /// position of a wider output. inputs = `[bit]`; outputs = `[out]`.
    Extend,
}

/// A node in the circuit graph: id, label, bus lists, delay, kind.
pub struct Element {
    pub id: ElementId,
    pub label: Option<String>,
    pub inputs: Vec<BusId>,
    pub outputs: Vec<BusId>,
    pub delay: u64,
    pub kind: ElementKind,
    /// Set when `delay` is still the bare per-kind fallback (`_ => 1`
    /// in [`kind_specific_delay`]) rather than a kind-specific default
    /// or an explicit [`Element::with_delay`] override. `Circuit::add_element`
    /// checks this to decide whether `SimulationConfig::default_delay`
    /// should take over.
    uses_default_delay: bool,
    logger: Option<Logger>,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind, inputs: Vec<BusId>, outputs: Vec<BusId>) -> Self {
        let (delay, uses_default_delay) = match kind_specific_delay(&kind) {
            Some(delay) => (delay, false),
            None => (1, true),
        };
        Self {
            id,
            label: None,
            inputs,
            outputs,
            delay,
            kind,
            uses_default_delay,
            logger: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self.uses_default_delay = false;
        self
    }

    /// Whether this element's `delay` should be overridden by
    /// `SimulationConfig::default_delay` when it is registered with a
    /// `Circuit` — true unless the kind has its own fixed default or an
    /// explicit delay was set via `with_delay`.
    pub fn uses_default_delay(&self) -> bool {
        self.uses_default_delay
    }

    /// Every bus this element must be attached to in the `BusNet` so
    /// that a value change on any of them re-enqueues it. For every
    /// kind except `Splitter` this is just `inputs ++ outputs`; the
    /// splitter attaches to its wide bus and every narrow bus instead.
    pub fn watched_buses(&self) -> Vec<BusId> {
        match &self.kind {
            ElementKind::Splitter(s) => {
                let mut buses = vec![s.wide];
                buses.extend(s.narrow.iter().copied());
                buses
            }
            _ => self
                .inputs
                .iter()
                .copied()
                .chain(self.outputs.iter().copied())
                .collect(),
        }
    }

    /// The buses this element is currently *driving*, honoring the
    /// splitter's direction-dependent contract: the wide bus alone when
    /// its last operation combined narrows into the wide bus, the
    /// narrow array otherwise. Every other kind simply reports
    /// `outputs`.
    pub fn current_outputs(&self) -> Vec<BusId> {
        match &self.kind {
            ElementKind::Splitter(s) => {
                if s.last_op == SplitterOp::PropIn {
                    vec![s.wide]
                } else {
                    s.narrow.clone()
                }
            }
            _ => self.outputs.clone(),
        }
    }

    /// Recompute this element's outputs from its current inputs and
    /// write them to `buses`, returning every bus whose value actually
    /// changed as a result. The delay to apply when scheduling a
    /// downstream element on one of those buses is that *downstream*
    /// element's own `delay`, not this one's — `resolve` only reports
    /// what changed, the caller decides when its observers run.
    pub fn resolve(&mut self, buses: &mut BusNet, now: u64) -> SimResult<Vec<BusId>> {
        self.log(Level::Trace, "resolve", &format!("resolving {}", self.id));
        let mut changed = Vec::new();
        match &mut self.kind {
            ElementKind::Gate(op) => {
                let inputs = read_all(buses, &self.inputs)?;
                let out = gates::resolve_gate(*op, &inputs)?;
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::Unary(op) => {
                let x = read_one(buses, self.inputs[0])?;
                let out = gates::resolve_unary(*op, x)?;
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::Mux { data_count } => {
                let data = read_all(buses, &self.inputs[..*data_count])?;
                let select = read_one(buses, self.inputs[*data_count])?;
                let out = mux::resolve_mux(&data, select)?;
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::Demux { output_count } => {
                let data = read_one(buses, self.inputs[0])?;
                let select = read_one(buses, self.inputs[1])?;
                let width = buses.width(self.inputs[0])?;
                let outs = mux::resolve_demux(*output_count, width, data, select)?;
                changed.extend(write_all(buses, &self.outputs, outs, now)?);
            }
            ElementKind::Decoder => {
                let input = read_one(buses, self.inputs[0])?;
                let input_width = buses.width(self.inputs[0])?;
                let outs = mux::resolve_decoder(input_width, input)?;
                changed.extend(write_all(buses, &self.outputs, outs, now)?);
            }
            ElementKind::PriorityEncoder { input_count } => {
                let data = read_all(buses, &self.inputs[..*input_count])?;
                let enable = read_one(buses, self.inputs[*input_count])?;
                let out = mux::resolve_priority_encoder(&data, enable)?;
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::BitSelector => {
                let data = read_one(buses, self.inputs[0])?;
                let selector = read_one(buses, self.inputs[1])?;
                let out = mux::resolve_bit_selector(data, selector)?;
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::Adder => {
                let a = read_one(buses, self.inputs[0])?;
                let b = read_one(buses, self.inputs[1])?;
                let cin = read_one(buses, self.inputs[2])?;
                let (sum, cout) = arithmetic::resolve_adder(a, b, cin)?;
                changed.extend(write_one(buses, self.outputs[0], sum, now)?);
                changed.extend(write_one(buses, self.outputs[1], cout, now)?);
            }
            ElementKind::TwosCompliment => {
                let x = read_one(buses, self.inputs[0])?;
                changed.extend(write_one(buses, self.outputs[0], x.map(|v| v.twos_compliment()), now)?);
            }
            ElementKind::TriState => {
                let data = read_one(buses, self.inputs[0])?;
                let control = read_one(buses, self.inputs[1])?;
                changed.extend(write_one(buses, self.outputs[0], misc::resolve_tristate(data, control)?, now)?);
            }
            ElementKind::ControlledInverter => {
                let data = read_one(buses, self.inputs[0])?;
                let control = read_one(buses, self.inputs[1])?;
                changed.extend(write_one(
                    buses,
                    self.outputs[0],
                    misc::resolve_controlled_inverter(data, control)?,
                    now,
                )?);
            }
            ElementKind::Constant(value) => {
                changed.extend(write_one(buses, self.outputs[0], Some(value.clone()), now)?);
            }
            ElementKind::Random(state) => {
                if state.observe_clock(clock_bit(buses, self.inputs[0])?) {
                    let width = buses.width(self.outputs[0])?;
                    let value = state.sample(width);
                    changed.extend(write_one(buses, self.outputs[0], Some(value), now)?);
                }
            }
            ElementKind::Counter(state) => {
                let reset = read_one(buses, self.inputs[1])?;
                let reset_high = is_high(reset.as_ref());
                if state.observe_clock(clock_bit(buses, self.inputs[0])?) || reset_high {
                    let width = buses.width(self.outputs[0])?;
                    let (value, zero) = state.advance(reset_high, width);
                    changed.extend(write_one(buses, self.outputs[0], Some(value), now)?);
                    changed.extend(write_one(buses, self.outputs[1], Some(zero), now)?);
                }
            }
            ElementKind::Alu => {
                let a = read_one(buses, self.inputs[0])?;
                let b = read_one(buses, self.inputs[1])?;
                let control = read_one(buses, self.inputs[2])?;
                let (result, carry) = arithmetic::resolve_alu(a, b, control)?;
                changed.extend(write_one(buses, self.outputs[0], result, now)?);
                changed.extend(write_one(buses, self.outputs[1], carry, now)?);
            }
            ElementKind::Clock { .. } => {
                // Driven by `Circuit::toggle_clock`, not by `resolve`.
            }
            ElementKind::DFlipFlop(state) => {
                let clock = clock_bit(buses, self.inputs[0])?;
                let d = read_one(buses, self.inputs[1])?;
                let enable = read_one(buses, self.inputs[2])?;
                let reset = read_one(buses, self.inputs[3])?;
                let (q, qn) = flipflop::resolve_d(state, clock, d, enable, reset);
                changed.extend(write_one(buses, self.outputs[0], q, now)?);
                changed.extend(write_one(buses, self.outputs[1], qn, now)?);
            }
            ElementKind::TFlipFlop(state) => {
                let clock = clock_bit(buses, self.inputs[0])?;
                let t = read_one(buses, self.inputs[1])?;
                let enable = read_one(buses, self.inputs[2])?;
                let reset = read_one(buses, self.inputs[3])?;
                let (q, qn) = flipflop::resolve_t(state, clock, t, enable, reset);
                changed.extend(write_one(buses, self.outputs[0], q, now)?);
                changed.extend(write_one(buses, self.outputs[1], qn, now)?);
            }
            ElementKind::JkFlipFlop(state) => {
                let clock = clock_bit(buses, self.inputs[0])?;
                let j = read_one(buses, self.inputs[1])?;
                let k = read_one(buses, self.inputs[2])?;
                let reset = read_one(buses, self.inputs[3])?;
                let (q, qn) = flipflop::resolve_jk(state, clock, j, k, reset);
                changed.extend(write_one(buses, self.outputs[0], q, now)?);
                changed.extend(write_one(buses, self.outputs[1], qn, now)?);
            }
            ElementKind::SrLatch(state) => {
                let s = read_one(buses, self.inputs[0])?;
                let r = read_one(buses, self.inputs[1])?;
                let (q, qn) = flipflop::resolve_sr(state, s, r);
                changed.extend(write_one(buses, self.outputs[0], q, now)?);
                changed.extend(write_one(buses, self.outputs[1], qn, now)?);
            }
            ElementKind::DLatch(state) => {
                let clock = clock_bit(buses, self.inputs[0])?;
                let d = read_one(buses, self.inputs[1])?;
                let (q, qn) = flipflop::resolve_d_latch(state, clock, d);
                changed.extend(write_one(buses, self.outputs[0], q, now)?);
                changed.extend(write_one(buses, self.outputs[1], qn, now)?);
            }
            ElementKind::Register(state) => {
                let clock = clock_bit(buses, self.inputs[0])?;
                let d = read_one(buses, self.inputs[1])?;
                let q = flipflop::resolve_register(state, clock, d);
                changed.extend(write_one(buses, self.outputs[0], q, now)?);
            }
            ElementKind::Rom(state) => {
                let address = read_one(buses, self.inputs[0])?;
                let cs = read_one(buses, self.inputs[1])?;
                let oe = read_one(buses, self.inputs[2])?;
                let out = memory::resolve_rom(state, address, cs, oe);
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::Ram(state) => {
                let address = read_one(buses, self.inputs[0])?;
                let data_in = read_one(buses, self.inputs[1])?;
                let cs = read_one(buses, self.inputs[2])?;
                let oe = read_one(buses, self.inputs[3])?;
                let we = read_one(buses, self.inputs[4])?;
                let reset = read_one(buses, self.inputs[5])?;
                let out = memory::resolve_ram(state, address, data_in, cs, oe, we, reset);
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
            ElementKind::Splitter(state) => {
                let before: Vec<_> = state
                    .narrow
                    .iter()
                    .copied()
                    .chain(std::iter::once(state.wide))
                    .map(|b| (b, buses.value(b).ok().flatten().cloned()))
                    .collect();
                splitter::resolve_splitter(state, buses, now, self.id)?;
                for (bus, before_value) in before {
                    if buses.value(bus)?.cloned() != before_value {
                        changed.push(bus);
                    }
                }
            }
            ElementKind::Subcircuit(state) => {
                let inputs = read_all(buses, &self.inputs)?;
                let (outputs, inner_delay) = state.resolve(inputs)?;
                self.delay = inner_delay;
                changed.extend(write_all(buses, &self.outputs, outputs, now)?);
            }
            ElementKind::InputPort | ElementKind::OutputPort => {
                // Ports never recompute on their own; `InputPort` is
                // only ever driven through `initialize`, and
                // `OutputPort` has nothing to write.
            }
            ElementKind::Extend => {
                let data = read_one(buses, self.inputs[0])?;
                let width = buses.width(self.outputs[0])?;
                let out = misc::resolve_extend(data, width)?;
                changed.extend(write_one(buses, self.outputs[0], out, now)?);
            }
        }
        Ok(changed)
    }

    /// Clear internal state and every owned output bus.
    pub fn reset(&mut self, buses: &mut BusNet) -> SimResult<()> {
        for &bus in &self.outputs {
            buses.reset(bus)?;
        }
        match &mut self.kind {
            ElementKind::Random(state) => state.reset(),
            ElementKind::Counter(state) => state.reset(),
            ElementKind::DFlipFlop(state) | ElementKind::TFlipFlop(state) => state.reset(),
            ElementKind::JkFlipFlop(state) => state.reset(),
            ElementKind::SrLatch(state) => state.reset(),
            ElementKind::DLatch(state) => state.reset(),
            ElementKind::Register(state) => state.reset(),
            ElementKind::Rom(state) | ElementKind::Ram(state) => state.reset(),
            ElementKind::Splitter(state) => {
                buses.reset(state.wide)?;
                for &n in &state.narrow {
                    buses.reset(n)?;
                }
                state.reset();
            }
            ElementKind::Subcircuit(state) => state.reset(),
            _ => {}
        }
        Ok(())
    }

    /// Drive `value` directly onto this element's primary output,
    /// bypassing the clock, for labeled-input seeding and `initialize`.
    /// Returns every bus whose value changed as a result, the same
    /// contract `resolve` follows, so the caller can enqueue observers.
    pub fn initialize(&mut self, buses: &mut BusNet, value: BitValue, now: u64) -> SimResult<Vec<BusId>> {
        let mut changed = Vec::new();
        match &mut self.kind {
            ElementKind::DFlipFlop(state) | ElementKind::TFlipFlop(state) => {
                state.initialize(value.clone());
                changed.extend(write_one(buses, self.outputs[0], Some(value.clone()), now)?);
                changed.extend(write_one(buses, self.outputs[1], Some(value.not()), now)?);
            }
            ElementKind::JkFlipFlop(state) => {
                state.initialize(value.clone());
                changed.extend(write_one(buses, self.outputs[0], Some(value.clone()), now)?);
                changed.extend(write_one(buses, self.outputs[1], Some(value.not()), now)?);
            }
            _ => {
                if !self.outputs.is_empty() {
                    changed.extend(write_one(buses, self.outputs[0], Some(value), now)?);
                } else if !self.inputs.is_empty() {
                    changed.extend(write_one(buses, self.inputs[0], Some(value), now)?);
                }
            }
        }
        Ok(changed)
    }
}

impl Loggable for Element {
    fn logger_slot(&mut self) -> &mut Option<Logger> {
        &mut self.logger
    }
    fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }
}

fn read_one(buses: &BusNet, bus: BusId) -> SimResult<Maybe> {
    Ok(buses.value(bus)?.cloned())
}

fn read_all(buses: &BusNet, ids: &[BusId]) -> SimResult<Vec<Maybe>> {
    ids.iter().map(|&id| read_one(buses, id)).collect()
}

fn write_one(buses: &mut BusNet, bus: BusId, value: Maybe, now: u64) -> SimResult<Vec<BusId>> {
    buses.set_value(bus, value, now)
}

fn write_all(
    buses: &mut BusNet,
    ids: &[BusId],
    values: Vec<Maybe>,
    now: u64,
) -> SimResult<Vec<BusId>> {
    let mut changed = Vec::new();
    for (&id, value) in ids.iter().zip(values) {
        changed.extend(buses.set_value(id, value, now)?);
    }
    Ok(changed)
}

fn clock_bit(buses: &BusNet, bus: BusId) -> SimResult<Option<bool>> {
    Ok(buses.value(bus)?.map(is_high_value))
}

fn is_high_value(v: &BitValue) -> bool {
    v.to_unsigned() != 0
}

fn is_high(v: Option<&BitValue>) -> bool {
    v.map(is_high_value).unwrap_or(false)
}

/// Smallest `k` such that `2^k >= n` (0 for `n <= 1`).
pub fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let mut k = 0;
    while (1usize << k) < n {
        k += 1;
    }
    k
}

/// Built-in default propagation delay for a freshly-constructed element
/// of this kind, or `None` when the kind has no fixed default of its
/// own and should instead track `SimulationConfig::default_delay` (see
/// `Element::uses_default_delay`).
fn kind_specific_delay(kind: &ElementKind) -> Option<u64> {
    match kind {
        ElementKind::Constant(_) | ElementKind::Clock { .. } => Some(0),
        ElementKind::Splitter(_) => Some(0),
        ElementKind::Subcircuit(_) => Some(0),
        ElementKind::InputPort | ElementKind::OutputPort => Some(0),
        ElementKind::Rom(_) | ElementKind::Ram(_) => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_log2_matches_expected_values() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
    }

    #[test]
    fn watched_buses_is_inputs_and_outputs_for_ordinary_kinds() {
        let mut net = BusNet::new();
        let a = net.create_bus(1);
        let y = net.create_bus(1);
        let e = Element::new(ElementId(0), ElementKind::Unary(UnaryOp::Not), vec![a], vec![y]);
        assert_eq!(e.watched_buses(), vec![a, y]);
    }
}
