//! 4-bit splitter round-trip — binary entry point.
//!
//! Builds a bidirectional splitter wired `[2, 2]` over a 4-bit wide bus
//! and drives it both ways: wide → narrow (split), then narrow → wide
//! (merge), demonstrating the reversed narrow-port ordering convention
//! the splitter uses for loader compatibility.

use dls_core::element::{Element, ElementKind, SplitterState};
use dls_core::{BitValue, Circuit, SimulationConfig};

fn build_splitter() -> (Circuit, [&'static str; 3]) {
    let mut circuit = Circuit::new(SimulationConfig::default());
    let wide = circuit.buses_mut().create_bus(4);
    let narrow0 = circuit.buses_mut().create_bus(2);
    let narrow1 = circuit.buses_mut().create_bus(2);

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![wide]).with_label("W"))
        .expect("wide input");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![narrow0]).with_label("N0"))
        .expect("narrow0 input");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![narrow1]).with_label("N1"))
        .expect("narrow1 input");

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(
            id,
            ElementKind::Splitter(SplitterState::new(wide, vec![narrow0, narrow1], vec![2, 2])),
            vec![],
            vec![],
        ))
        .expect("splitter");

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![wide], vec![]).with_label("W_out"))
        .expect("wide output tap");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![narrow0], vec![]).with_label("N0_out"))
        .expect("narrow0 output tap");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![narrow1], vec![]).with_label("N1_out"))
        .expect("narrow1 output tap");

    (circuit, ["W_out", "N0_out", "N1_out"])
}

fn show(circuit: &Circuit, labels: [&str; 3]) {
    for label in labels {
        let value = circuit.labeled_output_value(label).expect("labeled tap");
        println!("  {label} = {}", value.map(|v| v.to_string()).unwrap_or_else(|| "?".into()));
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    // Split direction: driving the wide bus alone forces propOut.
    let (mut split_circuit, labels) = build_splitter();
    println!("split: driving wide bus to 1011");
    split_circuit
        .set_labeled_input("W", Some(BitValue::from_binary_str("1011").unwrap()))
        .expect("drive wide");
    split_circuit.run_to_stability().expect("splitter resolves");
    show(&split_circuit, labels);

    // Merge direction: a fresh splitter instance, driven only from the
    // narrow side (the wide bus starts unset), forces propIn — the same
    // reversed-slice values the split above produced recover the
    // original wide value "1011".
    let (mut merge_circuit, labels) = build_splitter();
    println!("merge: driving narrow0=11, narrow1=10");
    merge_circuit
        .set_labeled_input("N0", Some(BitValue::from_binary_str("11").unwrap()))
        .expect("drive narrow0");
    merge_circuit
        .set_labeled_input("N1", Some(BitValue::from_binary_str("10").unwrap()))
        .expect("drive narrow1");
    merge_circuit.run_to_stability().expect("splitter resolves");
    show(&merge_circuit, labels);
}
