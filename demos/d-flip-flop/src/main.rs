//! D flip-flop edge/reset sequence — binary entry point.
//!
//! Walks a D flip-flop edge/reset sequence directly: initialize Q=0,
//! assert D=1 and enable=1, then toggle the clock bus low→high to
//! capture a rising edge, and finally show that asserting synchronous
//! reset (preset=1) forces Q=1 regardless of the clock.

use dls_core::element::{Element, ElementKind, EdgeTrigger, FlipFlopState};
use dls_core::{BitValue, Circuit, SimulationConfig};

fn build_d_flip_flop() -> Circuit {
    let mut circuit = Circuit::new(SimulationConfig::default());
    let clk = circuit.buses_mut().create_bus(1);
    let d = circuit.buses_mut().create_bus(1);
    let en = circuit.buses_mut().create_bus(1);
    let rst = circuit.buses_mut().create_bus(1);
    let q = circuit.buses_mut().create_bus(1);
    let qn = circuit.buses_mut().create_bus(1);

    let id = circuit.allocate_element_id();
    circuit.add_element(Element::new(id, ElementKind::InputPort, vec![], vec![clk]).with_label("CLK")).unwrap();
    let id = circuit.allocate_element_id();
    circuit.add_element(Element::new(id, ElementKind::InputPort, vec![], vec![d]).with_label("D")).unwrap();
    let id = circuit.allocate_element_id();
    circuit.add_element(Element::new(id, ElementKind::InputPort, vec![], vec![en]).with_label("EN")).unwrap();
    let id = circuit.allocate_element_id();
    circuit.add_element(Element::new(id, ElementKind::InputPort, vec![], vec![rst]).with_label("RST")).unwrap();

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
    circuit.add_element(Element::new(id, ElementKind::OutputPort, vec![q], vec![]).with_label("Q")).unwrap();
    let id = circuit.allocate_element_id();
    circuit.add_element(Element::new(id, ElementKind::OutputPort, vec![qn], vec![]).with_label("Qn")).unwrap();

    circuit
}

fn bit(v: i128) -> BitValue {
    BitValue::make(v, Some(1)).unwrap()
}

fn show(circuit: &Circuit, label: &str) {
    let q = circuit.labeled_output_value("Q").unwrap();
    let qn = circuit.labeled_output_value("Qn").unwrap();
    println!(
        "  {label}: Q={} Qn={}",
        q.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
        qn.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
    );
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut circuit = build_d_flip_flop();

    // Initialize Q=0 directly, bypassing the clock.
    circuit.set_labeled_input("FF", Some(bit(0))).expect("initialize FF");
    circuit.run_to_stability().expect("initialize settles");
    show(&circuit, "after initialize(Q=0)");

    circuit.set_labeled_input("D", Some(bit(1))).unwrap();
    circuit.set_labeled_input("EN", Some(bit(1))).unwrap();
    circuit.set_labeled_input("CLK", Some(bit(0))).unwrap();
    circuit.run_to_stability().expect("settle before the edge");
    show(&circuit, "D=1 EN=1 CLK=0 (no edge yet)");

    circuit.set_labeled_input("CLK", Some(bit(1))).unwrap();
    circuit.run_to_stability().expect("rising edge resolves");
    show(&circuit, "CLK rises to 1 (Q should capture D)");

    // A second flip-flop, preset to 1, shows synchronous reset
    // overriding the clock on every resolve.
    let mut reset_circuit = build_d_flip_flop();
    reset_circuit.set_labeled_input("FF", Some(bit(1))).expect("preset FF to 1");
    reset_circuit.set_labeled_input("RST", Some(bit(1))).unwrap();
    reset_circuit.set_labeled_input("D", Some(bit(0))).unwrap();
    reset_circuit.set_labeled_input("CLK", Some(bit(0))).unwrap();
    reset_circuit.run_to_stability().expect("reset settles");
    show(&reset_circuit, "RST=1 preset=1, CLK=0");
    reset_circuit.set_labeled_input("CLK", Some(bit(1))).unwrap();
    reset_circuit.run_to_stability().expect("reset holds across the edge too");
    show(&reset_circuit, "RST=1 preset=1, CLK rises (Q stays 1)");
}
